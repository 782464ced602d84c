//! Shared types for the commerce platform
//!
//! Currently this crate carries the unified error system used by the
//! HTTP server and any future worker binaries:
//!
//! - [`error::ErrorCode`] - stable string error codes with HTTP mapping
//! - [`error::AppError`] - application error (code + message + details)
//! - [`error::ApiResponse`] - unified API response envelope

pub mod error;

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
