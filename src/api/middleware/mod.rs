//! HTTP middleware for request processing and protection.
//!
//! Provides owner resolution, rate limiting, and observability middleware.

pub mod owner;
pub mod rate_limit;
pub mod tracing;
