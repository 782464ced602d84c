//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`ApiResponse`] - re-exported from `shared::error`
//! - [`AppResponse`] - legacy `{success, data, message}` envelope still
//!   used by the commerce routes (orders, stores, users, storage)
//! - logging and validation helpers

pub mod logger;
pub mod validation;

pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};

/// Legacy API response envelope
///
/// The catalog routes return bare DTOs; the commerce routes kept this
/// wrapper for compatibility with existing clients.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
