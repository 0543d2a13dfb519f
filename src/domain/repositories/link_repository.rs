//! Repository trait for link storage.

use crate::domain::entities::{Link, NewLink};
use async_trait::async_trait;

/// Errors returned by a link store.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// Another link already holds the key. Nothing was written.
    #[error("short key already exists")]
    KeyConflict,

    /// Any other storage failure (connectivity, schema, ...).
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Keyed, uniqueness-enforcing link store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - Mutex-guarded map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a link atomically.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::KeyConflict`] if the key is taken; no partial
    /// state is written. Returns [`StoreError::Storage`] on any other failure.
    async fn insert(&self, new_link: &NewLink) -> Result<Link, StoreError>;

    /// Finds a link by its key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] on storage failures.
    async fn find_by_key(&self, key: &str) -> Result<Option<Link>, StoreError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
