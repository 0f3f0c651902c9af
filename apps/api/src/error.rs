//! API error types and HTTP response mapping.
//!
//! ## Error Flow
//! ```text
//! CoreError / DbError ──► ApiError (this module) ──► HTTP status + JSON body
//! ```
//!
//! Two body shapes, both inherited from the previous backend:
//! - field validation failures: `{"errors": [{"msg": ..., "path": ...}]}`
//! - everything else:           `{"message": ...}`
//!
//! Internal failures log the real cause server-side and answer with a
//! generic message, so connection strings and SQL never reach a client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use botica_core::{CoreError, ValidationError};
use botica_db::DbError;

/// One failed field check, in the legacy body shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    #[serde(rename = "msg")]
    pub message: String,
    #[serde(rename = "path")]
    pub field: String,
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        FieldError {
            message: err.to_string(),
            field: err.field().to_string(),
        }
    }
}

/// API request errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields failed validation.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// The request was well-formed but violates a business rule.
    #[error("{0}")]
    BadRequest(String),

    /// Missing or unusable credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected failure. The string is logged, never sent.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::Internal(cause) => {
                error!(%cause, "Request failed");
                json!({ "message": "Server error" })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ApiError::Validation(vec![v.into()]),
            CoreError::AmountOverflow => ApiError::Internal(err.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { ref entity, .. } => {
                ApiError::NotFound(format!("{entity} not found"))
            }
            DbError::StockConflict { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_classes() {
        let validation = ApiError::Validation(vec![]);
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let unauthorized = ApiError::Unauthorized("Access token required".to_string());
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let forbidden = ApiError::Forbidden("Invalid token".to_string());
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

        let not_found = ApiError::NotFound("Order not found".to_string());
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let internal = ApiError::Internal("pool exhausted".to_string());
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn stock_conflict_becomes_bad_request_with_legacy_message() {
        let err: ApiError = DbError::StockConflict {
            medication_id: 4,
            description: "Paracetamol 500mg".to_string(),
        }
        .into();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Insufficient stock for Paracetamol 500mg");
    }

    #[test]
    fn db_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Medication", 7).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Medication not found");
    }

    #[test]
    fn db_internals_never_reach_the_body() {
        let err: ApiError = DbError::QueryFailed("relation does not exist".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn field_errors_use_legacy_keys() {
        let field = FieldError {
            message: "Valid email is required".to_string(),
            field: "email".to_string(),
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["msg"], "Valid email is required");
        assert_eq!(json["path"], "email");
    }
}
