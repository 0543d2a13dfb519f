//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contracts; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! - [`LinkRepository`] - Uniqueness-enforcing link store
//! - [`TokenRepository`] - API tokens for registered owners

pub mod link_repository;
pub mod token_repository;

pub use link_repository::{LinkRepository, StoreError};
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
