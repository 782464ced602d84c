//! Standardized error codes

use serde::{Deserialize, Serialize};

/// Stable error codes returned to API clients.
///
/// The string form (`E0003` etc.) is part of the wire contract; the enum
/// variants are free to be renamed as long as [`ErrorCode::code`] stays
/// stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // ========== General (0xxx) ==========
    Success,
    ValidationFailed,
    NotFound,
    AlreadyExists,
    InvalidRequest,

    // ========== Permission (2xxx) ==========
    PermissionDenied,

    // ========== Catalog (6xxx) ==========
    ProductNotFound,
    SkuExists,
    AttributeNotFound,
    AttributeCodeExists,
    AttributeSetNotFound,
    VariantNotFound,

    // ========== Translations (7xxx) ==========
    LanguageNotFound,
    TranslationKeyNotFound,

    // ========== Storage (8xxx) ==========
    FileNotFound,
    DirectoryNotFound,

    // ========== System (9xxx) ==========
    InternalError,
    DatabaseError,
}

impl ErrorCode {
    /// Stable string code for the wire format
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success => "E0000",
            Self::ValidationFailed => "E0002",
            Self::NotFound => "E0003",
            Self::AlreadyExists => "E0004",
            Self::InvalidRequest => "E0006",

            Self::PermissionDenied => "E2001",

            Self::ProductNotFound => "E6001",
            Self::SkuExists => "E6002",
            Self::AttributeNotFound => "E6003",
            Self::AttributeCodeExists => "E6004",
            Self::AttributeSetNotFound => "E6005",
            Self::VariantNotFound => "E6006",

            Self::LanguageNotFound => "E7001",
            Self::TranslationKeyNotFound => "E7002",

            Self::FileNotFound => "E8001",
            Self::DirectoryNotFound => "E8002",

            Self::InternalError => "E9001",
            Self::DatabaseError => "E9002",
        }
    }

    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::PermissionDenied => "Permission denied",

            Self::ProductNotFound => "Product not found",
            Self::SkuExists => "SKU already exists",
            Self::AttributeNotFound => "Attribute not found",
            Self::AttributeCodeExists => "Attribute code already exists",
            Self::AttributeSetNotFound => "Attribute set not found",
            Self::VariantNotFound => "Product variant not found",

            Self::LanguageNotFound => "Language not found",
            Self::TranslationKeyNotFound => "Translation key not found",

            Self::FileNotFound => "File not found",
            Self::DirectoryNotFound => "Directory not found",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
