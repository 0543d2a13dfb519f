//! Google Safe Browsing v4 reputation client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::security::{GateError, Reputation, ReputationService};

pub const DEFAULT_SAFE_BROWSING_URL: &str =
    "https://safebrowsing.googleapis.com/v4/threatMatches:find";

const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo,
    threat_info: ThreatInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: &'static str,
    client_version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: [&'static str; 4],
    platform_types: [&'static str; 1],
    threat_entry_types: [&'static str; 1],
    threat_entries: [ThreatEntry<'a>; 1],
}

#[derive(Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

/// `{}` for a clean URL, `{ "matches": [...] }` when flagged.
#[derive(Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<serde_json::Value>,
}

/// Reputation lookups against `threatMatches:find`.
pub struct SafeBrowsingClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SafeBrowsingClient {
    /// Builds a client; `timeout` bounds each HTTP request.
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, GateError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GateError::Lookup(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl ReputationService for SafeBrowsingClient {
    async fn check(&self, url: &str) -> Result<Reputation, GateError> {
        let body = FindRequest {
            client: ClientInfo {
                client_id: env!("CARGO_PKG_NAME"),
                client_version: env!("CARGO_PKG_VERSION"),
            },
            threat_info: ThreatInfo {
                threat_types: THREAT_TYPES,
                platform_types: ["ANY_PLATFORM"],
                threat_entry_types: ["URL"],
                threat_entries: [ThreatEntry { url }],
            },
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GateError::Timeout
                } else {
                    GateError::Lookup(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GateError::Upstream(format!("status {status}")));
        }

        let found: FindResponse = response
            .json()
            .await
            .map_err(|e| GateError::Upstream(e.to_string()))?;

        if found.matches.is_empty() {
            Ok(Reputation::Clean)
        } else {
            tracing::debug!(matches = found.matches.len(), "safe browsing match");
            Ok(Reputation::Flagged)
        }
    }
}
