//! HTTP-facing error type.
//!
//! Every failure that reaches a handler is an [`AppError`]. It renders as
//!
//! ```json
//! { "error": { "code": "validation_error", "message": "...", "details": { ... } } }
//! ```
//!
//! Internal errors are logged server-side and flattened to a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::ValidationErrors;

use crate::application::services::LinkError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Field-level validation failure; `details` maps field name to errors.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Whole-submission rejection by a security check.
    #[error("{message}")]
    Rejected { code: &'static str, message: String },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Conflict {
        code: &'static str,
        message: String,
        details: Value,
    },

    /// Escalation-worthy but retryable condition.
    #[error("{message}")]
    Unavailable { code: &'static str, message: String },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn rejected(code: &'static str, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn unavailable(code: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::Rejected { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts into the serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => {
                ("validation_error", message.clone(), details.clone())
            }
            AppError::Rejected { code, message } => (*code, message.clone(), json!({})),
            AppError::Unauthorized { message, details } => {
                ("unauthorized", message.clone(), details.clone())
            }
            AppError::NotFound { message, details } => {
                ("not_found", message.clone(), details.clone())
            }
            AppError::Conflict {
                code,
                message,
                details,
            } => (*code, message.clone(), details.clone()),
            AppError::Unavailable { code, message } => (*code, message.clone(), json!({})),
            AppError::Internal { message, details } => {
                ("internal_error", message.clone(), details.clone())
            }
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (
            status,
            Json(ErrorBody {
                error: self.to_error_info(),
            }),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", validation_details(&errors))
    }
}

impl From<LinkError> for AppError {
    fn from(e: LinkError) -> Self {
        match e {
            LinkError::Invalid(errors) => errors.into(),
            LinkError::PrivateLink => {
                AppError::rejected("private_link", "Links to private networks are not allowed")
            }
            LinkError::UnsafeLink => {
                AppError::rejected("unsafe_link", "This link has been flagged as unsafe")
            }
            LinkError::CustomCodeTaken { code } => AppError::conflict(
                "custom_code_taken",
                "Custom short code is already taken",
                json!({ "field": "short", "code": code }),
            ),
            LinkError::KeyExhausted { .. } => AppError::unavailable(
                "key_exhausted",
                "Could not allocate a short key, please retry",
            ),
            LinkError::Storage(message) => {
                tracing::error!(error = %message, "link storage failure");
                AppError::internal("Internal server error", json!({}))
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "conflict",
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        tracing::error!(error = %e, "database error");
        AppError::internal("Database error", json!({}))
    }
}

/// Renders field errors as `{ field: [{ code, message, params }] }`.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let mut fields = Map::new();

    for (field, errs) in errors.field_errors() {
        let items = errs
            .iter()
            .map(|e| {
                json!({
                    "code": e.code,
                    "message": e.message,
                    "params": e.params,
                })
            })
            .collect();
        fields.insert(field.to_string(), Value::Array(items));
    }

    Value::Object(fields)
}
