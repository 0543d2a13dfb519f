//! Link creation service.

use std::sync::Arc;

use chrono::Utc;
use validator::ValidationErrors;

use crate::application::schema::{LinkPolicy, LinkSchema, LinkSubmission, ValidLink};
use crate::application::security_gate::{GateRejection, SecurityGate};
use crate::domain::entities::{CreatedLink, Link, NewLink, Owner};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::utils::code_generator::KeyGenerator;
use crate::utils::hashing::hmac_sha256_hex;

/// Insert attempts for a generated key before giving up.
pub const MAX_KEY_ATTEMPTS: usize = 5;

/// Draws per attempt before a length is given up as reserved-only.
const RESERVED_REDRAWS: usize = 3;

/// Reasons link creation can fail.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// One or more fields failed validation.
    #[error("invalid link submission")]
    Invalid(ValidationErrors),

    #[error("link points to a private network")]
    PrivateLink,

    #[error("link was flagged as unsafe")]
    UnsafeLink,

    #[error("custom short code '{code}' is already taken")]
    CustomCodeTaken { code: String },

    /// Every generated key collided.
    #[error("no free short key after {attempts} attempts")]
    KeyExhausted { attempts: usize },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<GateRejection> for LinkError {
    fn from(rejection: GateRejection) -> Self {
        match rejection {
            GateRejection::PrivateLink => LinkError::PrivateLink,
            GateRejection::UnsafeLink => LinkError::UnsafeLink,
        }
    }
}

/// Creation settings fixed at startup.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    pub policy: LinkPolicy,
    /// Length of the first generated key; each collision adds one.
    pub base_key_length: usize,
    /// HMAC key for passphrase hashes.
    pub passphrase_secret: String,
}

/// Service for creating short links.
///
/// Composes validation, the security gate and the link store. Generated
/// keys start at the base length and widen by one character per collision,
/// up to [`MAX_KEY_ATTEMPTS`] inserts. Custom codes are never widened.
pub struct LinkService {
    repository: Arc<dyn LinkRepository>,
    keys: Arc<dyn KeyGenerator>,
    gate: SecurityGate,
    settings: LinkSettings,
}

impl LinkService {
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        keys: Arc<dyn KeyGenerator>,
        gate: SecurityGate,
        settings: LinkSettings,
    ) -> Self {
        Self {
            repository,
            keys,
            gate,
            settings,
        }
    }

    /// Validation rules for the owner's class.
    pub fn schema_for(&self, owner: &Owner) -> LinkSchema<'_> {
        self.settings.policy.schema_for(owner.is_privileged())
    }

    /// Validates, screens and stores a submission.
    ///
    /// The gate runs only after validation succeeds, and nothing is written
    /// unless the gate approves.
    ///
    /// # Errors
    ///
    /// - [`LinkError::Invalid`] with per-field errors
    /// - [`LinkError::PrivateLink`] / [`LinkError::UnsafeLink`] from the gate
    /// - any error from [`Self::persist`]
    pub async fn create_link(
        &self,
        submission: &LinkSubmission,
        owner: &Owner,
    ) -> Result<CreatedLink, LinkError> {
        let valid = self
            .schema_for(owner)
            .validate(submission)
            .map_err(LinkError::Invalid)?;

        self.gate.approve(&valid.url).await?;

        self.persist(valid, owner).await
    }

    /// Stores an already validated and approved link.
    ///
    /// # Errors
    ///
    /// - [`LinkError::CustomCodeTaken`] if the custom code exists or loses an insert race
    /// - [`LinkError::KeyExhausted`] after [`MAX_KEY_ATTEMPTS`] collisions
    /// - [`LinkError::Storage`] on any other store failure
    pub async fn persist(&self, valid: ValidLink, owner: &Owner) -> Result<CreatedLink, LinkError> {
        let created_at = Utc::now();
        let new_link = NewLink {
            key: String::new(),
            url: valid.url.into(),
            owner_id: owner.id.clone(),
            passphrase_hash: valid
                .passphrase
                .as_deref()
                .map(|p| hmac_sha256_hex(&self.settings.passphrase_secret, p)),
            call_limit: valid.call_limit,
            created_at,
            expires_at: valid.ttl.map(|step| created_at + step.duration()),
        };

        let link = match valid.short {
            Some(code) => self.insert_custom(code, new_link).await?,
            None => self.insert_generated(new_link).await?,
        };

        tracing::info!(
            key = %link.key,
            owner = owner.class(),
            expires_at = ?link.expires_at,
            "link created"
        );
        metrics::counter!("links_created_total").increment(1);

        Ok(link.into())
    }

    /// Verifies the link store is reachable.
    pub async fn check_store(&self) -> Result<(), LinkError> {
        self.repository.ping().await.map_err(storage_error)
    }

    async fn insert_custom(&self, code: String, mut new_link: NewLink) -> Result<Link, LinkError> {
        if self
            .repository
            .find_by_key(&code)
            .await
            .map_err(storage_error)?
            .is_some()
        {
            return Err(LinkError::CustomCodeTaken { code });
        }

        new_link.key = code;
        match self.repository.insert(&new_link).await {
            Ok(link) => Ok(link),
            Err(StoreError::KeyConflict) => Err(LinkError::CustomCodeTaken { code: new_link.key }),
            Err(e) => Err(storage_error(e)),
        }
    }

    async fn insert_generated(&self, mut new_link: NewLink) -> Result<Link, LinkError> {
        let base = self.settings.base_key_length;

        for attempt in 0..MAX_KEY_ATTEMPTS {
            let Some(key) = self.draw_key(base + attempt) else {
                tracing::debug!(attempt, length = base + attempt, "only reserved keys drawn");
                continue;
            };
            new_link.key = key;

            match self.repository.insert(&new_link).await {
                Ok(link) => return Ok(link),
                Err(StoreError::KeyConflict) => {
                    tracing::debug!(attempt, length = base + attempt, "short key collision");
                    metrics::counter!("link_key_collisions_total").increment(1);
                }
                Err(e) => return Err(storage_error(e)),
            }
        }

        tracing::error!(
            attempts = MAX_KEY_ATTEMPTS,
            base_length = base,
            "short key space exhausted"
        );
        metrics::counter!("link_key_exhausted_total").increment(1);

        Err(LinkError::KeyExhausted {
            attempts: MAX_KEY_ATTEMPTS,
        })
    }

    /// Draws a key of `length` that is not a reserved word.
    fn draw_key(&self, length: usize) -> Option<String> {
        (0..RESERVED_REDRAWS)
            .map(|_| self.keys.generate(length))
            .find(|key| !self.settings.policy.is_reserved(key))
    }
}

fn storage_error(e: StoreError) -> LinkError {
    match e {
        StoreError::Storage(message) => LinkError::Storage(message),
        StoreError::KeyConflict => LinkError::Storage("unexpected key conflict".to_string()),
    }
}
