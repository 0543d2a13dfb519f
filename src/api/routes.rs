//! API route configuration.
//!
//! Every API route runs behind [`crate::api::middleware::owner`], so
//! handlers always receive a resolved owner.

use crate::api::handlers::{create_link_handler, ttl_tiers_handler};
use crate::api::middleware::owner;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// API routes, to be nested under `/api`.
///
/// # Endpoints
///
/// - `POST /links` - Create a short link
/// - `GET  /ttl`   - TTL tiers available to the caller
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/ttl", get(ttl_tiers_handler))
        .route_layer(middleware::from_fn_with_state(state, owner::layer))
}
