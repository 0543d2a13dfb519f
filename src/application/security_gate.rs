//! Boundary checks run between field validation and persistence.
//!
//! Two independent predicates must both pass: the link must not resolve to a
//! private destination, and the reputation service must not flag it. Each
//! lookup is bounded by the configured timeout. A failed or timed-out lookup
//! never approves a link unless the policy explicitly fails open.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::security::{GateError, LinkResolver, Reachability, Reputation, ReputationService};

/// Gate behaviour knobs.
#[derive(Debug, Clone, Copy)]
pub struct GatePolicy {
    /// Run the deep public-link check. Off when private links are allowed.
    pub check_public_links: bool,
    /// Approve when the reputation service errors or times out.
    pub fail_open: bool,
    /// Bound on each external lookup.
    pub timeout: Duration,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            check_public_links: true,
            fail_open: false,
            timeout: Duration::from_millis(3000),
        }
    }
}

/// Why the gate refused a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    #[error("link points to a private network")]
    PrivateLink,

    #[error("link was flagged as unsafe")]
    UnsafeLink,
}

impl GateRejection {
    pub fn reason(self) -> &'static str {
        match self {
            GateRejection::PrivateLink => "private_link",
            GateRejection::UnsafeLink => "unsafe_link",
        }
    }
}

/// Sequential public-link and reputation checks.
pub struct SecurityGate {
    resolver: Arc<dyn LinkResolver>,
    reputation: Arc<dyn ReputationService>,
    policy: GatePolicy,
}

impl SecurityGate {
    pub fn new(
        resolver: Arc<dyn LinkResolver>,
        reputation: Arc<dyn ReputationService>,
        policy: GatePolicy,
    ) -> Self {
        Self {
            resolver,
            reputation,
            policy,
        }
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Approves `url` or names the reason it is refused.
    ///
    /// # Errors
    ///
    /// - [`GateRejection::PrivateLink`] if the link resolves to a private
    ///   destination, or the resolver fails
    /// - [`GateRejection::UnsafeLink`] if the link is flagged, or the
    ///   reputation service fails and the policy is fail-closed
    pub async fn approve(&self, url: &Url) -> Result<(), GateRejection> {
        if self.policy.check_public_links {
            self.check_reachability(url).await?;
        }

        self.check_reputation(url).await
    }

    async fn check_reachability(&self, url: &Url) -> Result<(), GateRejection> {
        match self.bounded(self.resolver.classify(url)).await {
            Ok(Reachability::Public) => Ok(()),
            Ok(Reachability::Private) => Err(self.reject(GateRejection::PrivateLink, url)),
            Err(e) => {
                tracing::warn!(host = url.host_str(), error = %e, "public link check failed");
                Err(self.reject(GateRejection::PrivateLink, url))
            }
        }
    }

    async fn check_reputation(&self, url: &Url) -> Result<(), GateRejection> {
        match self.bounded(self.reputation.check(url.as_str())).await {
            Ok(Reputation::Clean) => Ok(()),
            Ok(Reputation::Flagged) => Err(self.reject(GateRejection::UnsafeLink, url)),
            Err(e) if self.policy.fail_open => {
                tracing::warn!(
                    host = url.host_str(),
                    error = %e,
                    "reputation check failed, approving (fail-open)"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(host = url.host_str(), error = %e, "reputation check failed");
                Err(self.reject(GateRejection::UnsafeLink, url))
            }
        }
    }

    async fn bounded<T>(
        &self,
        lookup: impl Future<Output = Result<T, GateError>>,
    ) -> Result<T, GateError> {
        tokio::time::timeout(self.policy.timeout, lookup)
            .await
            .unwrap_or(Err(GateError::Timeout))
    }

    fn reject(&self, rejection: GateRejection, url: &Url) -> GateRejection {
        tracing::info!(
            host = url.host_str(),
            reason = rejection.reason(),
            "link rejected by security gate"
        );
        metrics::counter!("link_gate_rejections_total", "reason" => rejection.reason())
            .increment(1);
        rejection
    }
}
