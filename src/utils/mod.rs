//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Random short key generation
//! - [`url_normalizer`] - Link trimming, scheme defaulting and parsing
//! - [`ip_ranges`] - Private/reserved IP classification
//! - [`hashing`] - HMAC hashing of stored secrets
//! - [`db_error`] - PostgreSQL error classification

pub mod code_generator;
pub mod db_error;
pub mod hashing;
pub mod ip_ranges;
pub mod url_normalizer;
