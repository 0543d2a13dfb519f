//! Reputation service used when no Safe Browsing key is configured.

use async_trait::async_trait;

use crate::domain::security::{GateError, Reputation, ReputationService};

/// Approves every URL.
///
/// Selected explicitly at startup, which logs a warning; it is never a
/// fallback for a failing lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledReputation;

#[async_trait]
impl ReputationService for DisabledReputation {
    async fn check(&self, _url: &str) -> Result<Reputation, GateError> {
        Ok(Reputation::Clean)
    }
}
