//! In-process API token store.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Mutex;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

/// Token store for runs without a database.
///
/// Tokens can only be added through [`InMemoryTokenRepository::create_token`]
/// or [`InMemoryTokenRepository::seed`]; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<ApiToken>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an already hashed token for `owner_id`.
    pub fn seed(&self, name: &str, owner_id: &str, token_hash: &str) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.lock().map_err(poisoned)?;

        if tokens
            .iter()
            .any(|t| t.name == name || t.token_hash == token_hash)
        {
            return Err(AppError::conflict(
                "conflict",
                "Token name or hash already in use",
                json!({ "name": name }),
            ));
        }

        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::internal("Token store unavailable", json!({ "reason": "mutex poisoned" }))
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_owner(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        let tokens = self.tokens.lock().map_err(poisoned)?;
        Ok(tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.revoked_at.is_none())
            .map(|t| t.owner_id.clone()))
    }

    async fn update_last_used(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        owner_id: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        self.seed(name, owner_id, token_hash)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let tokens = self.tokens.lock().map_err(poisoned)?;
        Ok(tokens.iter().rev().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.lock().map_err(poisoned)?;
        Ok(tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let mut tokens = self.tokens.lock().map_err(poisoned)?;
        match tokens
            .iter_mut()
            .find(|t| t.id == id && t.revoked_at.is_none())
        {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found(
                "Token not found or already revoked",
                json!({ "id": id }),
            )),
        }
    }
}
