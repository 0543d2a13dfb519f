//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL link store
//! - [`PgTokenRepository`] - PostgreSQL API token store
//! - [`InMemoryLinkRepository`] - Mutex-guarded link map
//! - [`InMemoryTokenRepository`] - Mutex-guarded token list

pub mod memory_link_repository;
pub mod memory_token_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use memory_token_repository::InMemoryTokenRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
