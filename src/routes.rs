//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Liveness and store readiness (public)
//! - `POST /api/links`   - Create a short link (anonymous or Bearer token)
//! - `GET  /api/ttl`     - TTL tiers available to the caller
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on `/api` (configurable for proxy deployments)
//! - **Owner resolution** - Optional Bearer token, temporary owner otherwise
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// The rate limiter needs the peer address, so the returned service must be
/// served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let api_router = rate_limit::apply(api::routes::routes(state.clone()), behind_proxy);
    build(state, api_router)
}

/// Same routes without the rate limiter, for in-process callers that have
/// no peer address.
pub fn app_router_unthrottled(state: AppState) -> NormalizePath<Router> {
    let api_router = api::routes::routes(state.clone());
    build(state, api_router)
}

fn build(state: AppState, api_router: Router<AppState>) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
