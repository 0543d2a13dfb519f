//! Domain layer: entities, policies and collaborator contracts.
//!
//! Nothing here depends on HTTP or a concrete database.
//!
//! - [`entities`] - Link records and owners
//! - [`ttl`] - The TTL ladder and per-class ceilings
//! - [`repositories`] - Storage traits
//! - [`security`] - Reputation and public-link resolver traits

pub mod entities;
pub mod repositories;
pub mod security;
pub mod ttl;
