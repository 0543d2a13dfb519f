//! PostgreSQL token store tests. Run with `cargo test -- --ignored` against a
//! database named by `DATABASE_URL`.

use linkcut::domain::repositories::TokenRepository;
use linkcut::error::AppError;
use linkcut::infrastructure::persistence::PgTokenRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("test-token", "team-a", "hash123")
        .await
        .unwrap();

    assert_eq!(token.name, "test-token");
    assert_eq!(token.owner_id, "team-a");
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_owner(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    repo.create_token("ci", "team-a", "validhash").await.unwrap();

    assert_eq!(
        repo.find_owner("validhash").await.unwrap(),
        Some("team-a".to_string())
    );
    assert_eq!(repo.find_owner("nonexistent").await.unwrap(), None);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_revoked_token_has_no_owner(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo
        .create_token("revoked-token", "team-a", "revokedhash")
        .await
        .unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert_eq!(repo.find_owner("revokedhash").await.unwrap(), None);
    assert!(matches!(
        repo.revoke_token(token.id).await,
        Err(AppError::NotFound { .. })
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool.clone()));
    repo.create_token("used", "team-a", "usedhash").await.unwrap();

    repo.update_last_used("usedhash").await.unwrap();

    let last_used: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT last_used_at FROM api_tokens WHERE token_hash = $1")
            .bind("usedhash")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_used.is_some());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_name_conflicts(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    repo.create_token("dup", "team-a", "hash-1").await.unwrap();

    assert!(matches!(
        repo.create_token("dup", "team-b", "hash-2").await,
        Err(AppError::Conflict { .. })
    ));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_list_and_find_by_name(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));
    repo.create_token("first", "team-a", "h1").await.unwrap();
    repo.create_token("second", "team-b", "h2").await.unwrap();

    let tokens = repo.list_tokens().await.unwrap();
    assert_eq!(tokens.len(), 2);

    let found = repo.find_by_name("second").await.unwrap().unwrap();
    assert_eq!(found.owner_id, "team-b");
    assert!(repo.find_by_name("third").await.unwrap().is_none());
}
