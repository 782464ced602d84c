//! Unified error system
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors (products, attributes, variants)
//! - 7xxx: Translation errors
//! - 8xxx: Storage errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create an error with a custom message
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "sku must not be empty");
//!
//! // Convenience constructors
//! let err = AppError::not_found("Product 42");
//!
//! // Convert to an API response body
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod codes;
mod http;
mod types;

pub use codes::ErrorCode;
pub use types::{ApiResponse, AppError, AppResult};
