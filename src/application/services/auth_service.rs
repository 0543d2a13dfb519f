//! Owner resolution from API tokens.

use std::sync::Arc;

use crate::domain::entities::Owner;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use crate::utils::code_generator::generate_key;
use crate::utils::hashing::hmac_sha256_hex;
use serde_json::json;

/// Length of the random part of a temporary owner id.
const TEMPORARY_ID_LENGTH: usize = 16;

/// Resolves the owner of a request.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before
/// lookup, so the store never sees a raw token.
pub struct AuthService {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Returns the 64-character hex HMAC of a raw token.
    pub fn hash_token(&self, token: &str) -> String {
        hmac_sha256_hex(&self.signing_secret, token)
    }

    /// Maps a bearer token to its registered owner.
    ///
    /// Without a token the caller is a fresh temporary owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn resolve_owner(&self, token: Option<&str>) -> Result<Owner, AppError> {
        let Some(token) = token else {
            return Ok(Owner::temporary(format!(
                "tmp-{}",
                generate_key(TEMPORARY_ID_LENGTH)
            )));
        };

        let token_hash = self.hash_token(token);

        let Some(owner_id) = self.repository.find_owner(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, "failed to record token use");
        }

        Ok(Owner::registered(owner_id))
    }
}
