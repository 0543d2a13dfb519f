//! DTOs for the TTL tier listing.

use serde::Serialize;

use crate::application::schema::LinkSchema;

/// TTL choices available to the caller.
#[derive(Debug, Serialize)]
pub struct TtlTiersResponse {
    /// True if links may never expire.
    pub unbounded: bool,
    pub tiers: Vec<TtlTier>,
    /// Milliseconds applied when `ttl` is omitted; `null` means no expiry.
    #[serde(rename = "default")]
    pub default_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TtlTier {
    pub step: usize,
    pub label: &'static str,
    pub ms: i64,
}

impl From<&LinkSchema<'_>> for TtlTiersResponse {
    fn from(schema: &LinkSchema<'_>) -> Self {
        Self {
            unbounded: schema.is_unbounded(),
            tiers: schema
                .ttl_tiers()
                .iter()
                .map(|step| TtlTier {
                    step: step.index(),
                    label: step.label(),
                    ms: step.duration_ms(),
                })
                .collect(),
            default_ms: schema.default_ttl().map(|step| step.duration_ms()),
        }
    }
}
