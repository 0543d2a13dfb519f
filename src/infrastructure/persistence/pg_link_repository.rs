//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkRepository, StoreError};
use crate::utils::db_error::is_unique_violation_on_key;

const LINK_COLUMNS: &str =
    "key, url, owner_id, passphrase_hash, call_limit, calls, created_at, expires_at";

/// PostgreSQL repository for link storage.
///
/// Key uniqueness is enforced by the `links` primary key, so concurrent
/// inserts of the same key resolve to exactly one winner.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    key: String,
    url: String,
    owner_id: String,
    passphrase_hash: Option<String>,
    call_limit: Option<i64>,
    calls: Option<i64>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for Link {
    fn from(row: LinkRow) -> Self {
        Link {
            key: row.key,
            url: row.url,
            owner_id: row.owner_id,
            passphrase_hash: row.passphrase_hash,
            call_limit: row.call_limit,
            calls: row.calls,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

fn storage_error(e: sqlx::Error) -> StoreError {
    tracing::error!(error = %e, "link store error");
    StoreError::Storage(e.to_string())
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: &NewLink) -> Result<Link, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO links (key, url, owner_id, passphrase_hash, call_limit, calls, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, NULL, $6, $7)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(&new_link.key)
            .bind(&new_link.url)
            .bind(&new_link.owner_id)
            .bind(&new_link.passphrase_hash)
            .bind(new_link.call_limit)
            .bind(new_link.created_at)
            .bind(new_link.expires_at)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| {
                if is_unique_violation_on_key(&e) {
                    StoreError::KeyConflict
                } else {
                    storage_error(e)
                }
            })?;

        Ok(row.into())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Link>, StoreError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE key = $1");

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(storage_error)?;

        Ok(row.map(Link::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(storage_error)?;

        Ok(())
    }
}
