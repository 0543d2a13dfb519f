//! Owner resolution middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Resolves the request's [`crate::domain::entities::Owner`] and stores it
/// in request extensions.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Resolution
///
/// - Valid token: the registered owner bound to it
/// - No `Authorization` header: a fresh temporary owner
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is present but malformed, or the
/// token is unknown or revoked. A bad token never falls back to an anonymous
/// owner.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = if parts.headers.contains_key(AUTHORIZATION) {
        let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
            .await
            .map_err(|_| {
                AppError::unauthorized(
                    "Unauthorized",
                    serde_json::json!({"reason": "Authorization header is invalid"}),
                )
            })?;
        Some(token)
    } else {
        None
    };

    let owner = st.auth_service.resolve_owner(token.as_deref()).await?;
    tracing::debug!(owner = %owner.id, class = owner.class(), "owner resolved");

    parts.extensions.insert(owner);

    Ok(next.run(Request::from_parts(parts, body)).await)
}
