//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, the security gate collaborators, service wiring
//! and the Axum server lifecycle.

use crate::application::security_gate::SecurityGate;
use crate::application::services::{AuthService, LinkService, LinkSettings};
use crate::config::Config;
use crate::domain::repositories::{LinkRepository, TokenRepository};
use crate::domain::security::ReputationService;
use crate::infrastructure::persistence::{
    InMemoryLinkRepository, InMemoryTokenRepository, PgLinkRepository, PgTokenRepository,
};
use crate::infrastructure::security::{DisabledReputation, DnsLinkResolver, SafeBrowsingClient};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomKeyGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Link and token stores backing the services.
pub struct Stores {
    pub links: Arc<dyn LinkRepository>,
    pub tokens: Arc<dyn TokenRepository>,
}

/// Connects the configured stores.
///
/// With `DATABASE_URL` set this opens a PostgreSQL pool and applies
/// migrations; otherwise both stores live in memory.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_stores(config: &Config) -> Result<Stores> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, links and tokens are kept in memory");
        return Ok(Stores {
            links: Arc::new(InMemoryLinkRepository::new()),
            tokens: Arc::new(InMemoryTokenRepository::new()),
        });
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    Ok(Stores {
        links: Arc::new(PgLinkRepository::new(pool.clone())),
        tokens: Arc::new(PgTokenRepository::new(pool)),
    })
}

/// Picks the reputation service for the configured key.
fn reputation_service(config: &Config) -> Result<Arc<dyn ReputationService>> {
    match &config.safe_browsing_api_key {
        Some(api_key) => {
            let client = SafeBrowsingClient::new(
                config.safe_browsing_url.clone(),
                api_key.clone(),
                config.gate_timeout(),
            )
            .context("Failed to build Safe Browsing client")?;
            tracing::info!("Safe Browsing checks enabled");
            Ok(Arc::new(client))
        }
        None => {
            tracing::warn!("SAFE_BROWSING_API_KEY not set, reputation checks are disabled");
            Ok(Arc::new(DisabledReputation))
        }
    }
}

/// Wires services on top of `stores`.
pub fn build_state(config: &Config, stores: Stores) -> Result<AppState> {
    let gate = SecurityGate::new(
        Arc::new(DnsLinkResolver::new()),
        reputation_service(config)?,
        config.gate_policy(),
    );

    let link_service = LinkService::new(
        stores.links,
        Arc::new(RandomKeyGenerator),
        gate,
        LinkSettings {
            policy: config.link_policy(),
            base_key_length: config.short_key_length,
            passphrase_secret: config.token_signing_secret.clone(),
        },
    );
    let auth_service = AuthService::new(stores.tokens, config.token_signing_secret.clone());

    Ok(AppState::new(
        Arc::new(link_service),
        Arc::new(auth_service),
        &config.public_base_url,
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link and token stores (PostgreSQL or in-memory)
/// - Apply migrations
/// - Security gate (DNS resolver, Safe Browsing or disabled reputation)
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = connect_stores(&config).await?;
    let state = build_state(&config, stores)?;

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
