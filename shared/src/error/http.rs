//! HTTP status mapping and axum integration

use super::codes::ErrorCode;
use super::types::{ApiResponse, AppError};
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ProductNotFound
            | Self::AttributeNotFound
            | Self::AttributeSetNotFound
            | Self::VariantNotFound
            | Self::LanguageNotFound
            | Self::TranslationKeyNotFound
            | Self::FileNotFound
            | Self::DirectoryNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::SkuExists | Self::AttributeCodeExists => {
                StatusCode::CONFLICT
            }

            // 403 Forbidden
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 400 Bad Request
            Self::ValidationFailed | Self::InvalidRequest => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal failures are logged server-side and returned opaque
        let body = match self.code {
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                error!(target: "api", code = %self.code, error = %self.message, "request failed");
                ApiResponse::<()>::error(&AppError::new(self.code))
            }
            _ => ApiResponse::<()>::error(&self),
        };

        (self.code.http_status(), Json(body)).into_response()
    }
}
