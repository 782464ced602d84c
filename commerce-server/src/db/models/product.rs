//! Product model and search DTOs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::product_attribute_value::AttributeFilter;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub currency: String,
    /// "draft" | "published" | "archived"
    pub status: String,
    /// "simple" | "variable"
    pub product_type: String,
    pub category_id: Option<i64>,
    /// Free-form JSON blob for client-side extensions
    pub metadata: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: i64,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub product_type: Option<String>,
    pub category_id: Option<i64>,
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub product_type: Option<String>,
    pub category_id: Option<i64>,
    pub metadata: Option<String>,
}

/// Faceted search request
///
/// Filters on different attributes are ANDed; value ids inside one
/// filter are ORed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearchRequest {
    #[serde(default)]
    pub filters: Vec<AttributeFilter>,
    pub category_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}
