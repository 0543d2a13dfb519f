//! Contracts for the external security collaborators.
//!
//! Both are consulted by [`crate::application::security_gate::SecurityGate`]
//! after field validation and before persistence. Implementations live in
//! [`crate::infrastructure::security`].

use async_trait::async_trait;
use url::Url;

/// Verdict of a reputation lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reputation {
    Clean,
    Flagged,
}

/// Network class a link resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Public,
    Private,
}

/// Failure of an external security lookup.
///
/// Never an approval: the gate decides how each kind of failure is treated.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("lookup timed out")]
    Timeout,

    #[error("lookup failed: {0}")]
    Lookup(String),

    #[error("unexpected upstream response: {0}")]
    Upstream(String),
}

/// Third-party malicious-URL lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReputationService: Send + Sync {
    /// Looks up the URL and reports whether it is flagged.
    async fn check(&self, url: &str) -> Result<Reputation, GateError>;
}

/// Deep public-reachability check for a link.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkResolver: Send + Sync {
    /// Classifies where the URL actually points.
    async fn classify(&self, url: &Url) -> Result<Reachability, GateError>;
}
