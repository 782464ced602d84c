//! Product variant models
//!
//! Variants are concrete combinations of select-attribute values
//! ("Red / S"). Generation previews the cartesian product; persisting a
//! variant also records its axis values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub currency: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantCreate {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub price_cents: i64,
    pub currency: Option<String>,
    /// Axis values pinning this variant, one per select attribute
    #[serde(default)]
    pub axis_values: Vec<VariantAxisValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantUpdate {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

/// One axis coordinate of a variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAxisValue {
    pub attribute_id: i64,
    pub attribute_value_id: i64,
}

/// Preview row from variant generation, not yet persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVariant {
    /// Display name joined from value labels ("Red / S")
    pub name: String,
    pub axis_values: Vec<VariantAxisValue>,
}
