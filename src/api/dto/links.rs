//! DTOs for link creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::schema::LinkSubmission;
use crate::domain::entities::CreatedLink;

/// Request body for `POST /api/links`.
///
/// Only size limits are checked here; the link rules for the caller's
/// class are applied by the link service.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// Target URL; a missing scheme defaults to `https://`.
    #[serde(default)]
    pub link: String,

    #[validate(length(max = 256, message = "Passphrase must be at most 256 characters"))]
    pub passphrase: Option<String>,

    /// Maximum number of redirects. Kept as a float so `1.5` is a field error.
    pub call_limit: Option<f64>,

    /// Custom short code.
    #[validate(length(max = 64, message = "Short code must be at most 64 characters"))]
    pub short: Option<String>,

    /// Lifetime in milliseconds, one of the offered tiers.
    pub ttl: Option<f64>,
}

impl From<CreateLinkRequest> for LinkSubmission {
    fn from(req: CreateLinkRequest) -> Self {
        LinkSubmission {
            link: req.link,
            passphrase: req.passphrase,
            call_limit: req.call_limit,
            short: req.short,
            ttl: req.ttl,
        }
    }
}

/// A created link. Never carries the passphrase.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub key: String,
    pub url: String,
    pub short_url: String,
    pub has_passphrase: bool,
    pub call_limit: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl LinkResponse {
    pub fn new(link: CreatedLink, short_url: String) -> Self {
        Self {
            key: link.key,
            url: link.url,
            short_url,
            has_passphrase: link.has_passphrase,
            call_limit: link.call_limit,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}
