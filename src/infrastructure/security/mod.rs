//! Security gate collaborators.
//!
//! - [`SafeBrowsingClient`] - Google Safe Browsing v4 lookups
//! - [`DisabledReputation`] - Approves everything, for deployments without a key
//! - [`DnsLinkResolver`] - Resolves hosts and flags private destinations

pub mod disabled;
pub mod dns_resolver;
pub mod safe_browsing;

pub use disabled::DisabledReputation;
pub use dns_resolver::DnsLinkResolver;
pub use safe_browsing::{DEFAULT_SAFE_BROWSING_URL, SafeBrowsingClient};
