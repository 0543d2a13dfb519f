//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;

pub use health::health_handler;
pub use links::{create_link_handler, ttl_tiers_handler};
