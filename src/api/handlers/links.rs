//! Handlers for link creation and TTL tiers.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse};
use crate::api::dto::ttl::TtlTiersResponse;
use crate::application::schema::LinkSubmission;
use crate::domain::entities::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for the resolved owner.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "link": "example.com/page",
///   "passphrase": "optional secret",
///   "callLimit": 10,
///   "short": "my-link",
///   "ttl": 86400000
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "key": "my-link",
///   "url": "https://example.com/page",
///   "shortUrl": "https://s.example.com/my-link",
///   "hasPassphrase": true,
///   "callLimit": 10,
///   "createdAt": "2024-01-01T00:00:00Z",
///   "expiresAt": "2024-01-02T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - `400 validation_error` with per-field details
/// - `400 private_link` / `400 unsafe_link` from the security gate
/// - `409 custom_code_taken`
/// - `503 key_exhausted`
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let submission = LinkSubmission::from(payload);
    let link = state.link_service.create_link(&submission, &owner).await?;
    let short_url = state.short_url(&link.key);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists the TTL tiers the caller may choose from.
///
/// # Endpoint
///
/// `GET /api/ttl`
///
/// # Response
///
/// ```json
/// {
///   "unbounded": false,
///   "tiers": [
///     { "step": 0, "label": "anhour", "ms": 3600000 },
///     { "step": 1, "label": "aday", "ms": 86400000 },
///     { "step": 2, "label": "aweek", "ms": 604800000 }
///   ],
///   "default": 604800000
/// }
/// ```
pub async fn ttl_tiers_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
) -> Json<TtlTiersResponse> {
    Json(TtlTiersResponse::from(&state.link_service.schema_for(&owner)))
}
