//! Repository Module
//!
//! Provides CRUD operations over the SQLite tables. Multi-table writes
//! run inside explicit transactions.

// Catalog
pub mod attribute;
pub mod attribute_set;
pub mod category;
pub mod product;
pub mod product_attribute_value;
pub mod product_variant;

// Commerce
pub mod order;
pub mod store;
pub mod user;

// Storage / i18n
pub mod file;
pub mod translation;

// Re-exports
pub use attribute::AttributeRepository;
pub use attribute_set::AttributeSetRepository;
pub use category::CategoryRepository;
pub use file::FileRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use product_attribute_value::ProductAttributeValueRepository;
pub use product_variant::ProductVariantRepository;
pub use store::StoreRepository;
pub use translation::TranslationRepository;
pub use user::UserRepository;

use crate::utils::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        // Repository messages are already full sentences
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
