//! # API Error Type
//!
//! Unified error type for storefront handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vitrine                                │
//! │                                                                         │
//! │  Handler                                                                │
//! │  Result<Json<PageView>, ApiError>                                       │
//! │         │                                                               │
//! │         ├── ValidationError / AuthError ──► NOT an ApiError:            │
//! │         │   rendered as a warning / error Notice on the page (200)      │
//! │         │                                                               │
//! │         ├── CoreError::NotAuthenticated ──► 403 NOT_AUTHENTICATED       │
//! │         ├── CoreError::InvalidTransition ─► 409 INVALID_TRANSITION      │
//! │         ├── CoreError::ProductNotFound ───► 404 NOT_FOUND               │
//! │         ├── DbError ──────────────────────► 500 DATABASE_ERROR          │
//! │         └── BlobError ────────────────────► 500 STORAGE_ERROR           │
//! │                                                                         │
//! │  Body: { "code": "DATABASE_ERROR", "message": "Database operation ..." }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Internal details are logged, never sent to the client.

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use vitrine_blob::BlobError;
use vitrine_core::CoreError;
use vitrine_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_AUTHENTICATED",
///   "message": "Operator login required"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Mutation attempted without an operator login (403)
    NotAuthenticated,

    /// Event not valid on the current page (409)
    InvalidTransition,

    /// Resource not found (404)
    NotFound,

    /// Input could not be decoded (400)
    BadRequest,

    /// Request body over the upload limit (413)
    PayloadTooLarge,

    /// Database operation failed (500)
    DatabaseError,

    /// Blob upload failed (500)
    StorageError,

    /// Session store failed (500)
    SessionError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotAuthenticated => StatusCode::FORBIDDEN,
            ErrorCode::InvalidTransition => StatusCode::CONFLICT,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::DatabaseError
            | ErrorCode::StorageError
            | ErrorCode::SessionError
            | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => ApiError::new(ErrorCode::NotAuthenticated, err.to_string()),
            CoreError::InvalidTransition { .. } | CoreError::NoProductSelected => {
                ApiError::new(ErrorCode::InvalidTransition, err.to_string())
            }
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", id),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                error!(error = %err, "Database unavailable");
                ApiError::new(ErrorCode::DatabaseError, "Database unavailable")
            }
            other => {
                // Log the actual error but return a generic message
                error!(error = %other, "Database operation failed");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts blob errors to API errors.
impl From<BlobError> for ApiError {
    fn from(err: BlobError) -> Self {
        error!(error = %err, "Image upload failed");
        ApiError::new(ErrorCode::StorageError, "Image upload failed")
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        error!(error = %err, "Session store failed");
        ApiError::new(ErrorCode::SessionError, "Session unavailable")
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::new(ErrorCode::PayloadTooLarge, "Upload is too large")
        } else {
            ApiError::new(ErrorCode::BadRequest, err.body_text())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::new(ErrorCode::BadRequest, err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::Page;

    #[test]
    fn test_core_error_statuses() {
        let cases = [
            (CoreError::NotAuthenticated, StatusCode::FORBIDDEN),
            (
                CoreError::InvalidTransition {
                    page: Page::Login,
                    action: "buy a product",
                },
                StatusCode::CONFLICT,
            ),
            (CoreError::NoProductSelected, StatusCode::CONFLICT),
            (CoreError::ProductNotFound(3), StatusCode::NOT_FOUND),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).code.status(), status);
        }
    }

    #[test]
    fn test_db_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: Produtos".to_string()));
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("Produtos"));
    }

    #[test]
    fn test_blob_errors_are_server_errors() {
        let err = ApiError::from(BlobError::UploadFailed {
            status: 403,
            body: "AuthenticationFailed".to_string(),
        });
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("AuthenticationFailed"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::new(ErrorCode::NotAuthenticated, "nope")).unwrap();
        assert_eq!(json["code"], "NOT_AUTHENTICATED");
        assert_eq!(json["message"], "nope");
    }
}
