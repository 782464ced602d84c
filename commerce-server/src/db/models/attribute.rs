//! Attribute and attribute value models
//!
//! Attributes describe one axis of product data ("Color", "Weight").
//! Select/multiselect attributes own a list of predefined values;
//! text/number/boolean attributes carry free-form values on the
//! product assignment itself.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Attribute definition
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attribute {
    pub id: i64,
    /// Stable machine code, unique across the catalog
    pub code: String,
    pub name: String,
    /// "select" | "multiselect" | "text" | "number" | "boolean"
    pub input_type: String,
    /// "string" | "number" | "boolean"
    pub data_type: String,
    /// Optional display unit ("kg", "cm")
    pub unit: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Attribute {
    /// Select and multiselect attributes reference predefined values
    pub fn is_selectable(&self) -> bool {
        self.input_type == "select" || self.input_type == "multiselect"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeCreate {
    pub code: String,
    pub name: String,
    pub input_type: String,
    pub data_type: String,
    pub unit: Option<String>,
    /// Initial predefined values for select/multiselect attributes
    #[serde(default)]
    pub values: Vec<AttributeValueCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
}

/// Predefined value of a select/multiselect attribute
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttributeValue {
    pub id: i64,
    pub attribute_id: i64,
    pub value_code: String,
    pub label: String,
    pub sort_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeValueCreate {
    pub value_code: String,
    pub label: String,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeValueUpdate {
    pub label: Option<String>,
    pub sort_order: Option<i64>,
}
