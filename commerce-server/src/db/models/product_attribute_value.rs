//! Product attribute value models
//!
//! The normalized table stores one row per (product, attribute, value).
//! Multiselect assignments therefore span several rows; the grouped DTO
//! folds them back into a single entry per attribute.

use serde::{Deserialize, Serialize};

/// Typed value of an attribute assignment
///
/// Exactly one representation applies, selected by the attribute's
/// input type. `Selections` exists only at the DTO level; on disk it
/// expands into one row per selected value id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeValueData {
    Text { value: String },
    Number { value: f64 },
    Boolean { value: bool },
    Selection { attribute_value_id: i64 },
    Selections { attribute_value_ids: Vec<i64> },
}

impl AttributeValueData {
    /// Value ids referenced by this assignment (empty for free-form values)
    pub fn value_ids(&self) -> Vec<i64> {
        match self {
            Self::Selection { attribute_value_id } => vec![*attribute_value_id],
            Self::Selections {
                attribute_value_ids,
            } => attribute_value_ids.clone(),
            _ => vec![],
        }
    }
}

/// Assignment input: one attribute with its typed value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeAssignment {
    pub attribute_id: i64,
    #[serde(flatten)]
    pub data: AttributeValueData,
}

/// Raw storage row, as read back from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductAttributeValueRow {
    pub id: i64,
    pub product_id: i64,
    pub attribute_id: i64,
    pub attribute_value_id: Option<i64>,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
    pub value_boolean: Option<bool>,
}

/// Grouped read DTO: one entry per attribute, multiselect rows folded
/// back into a `Selections` value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedAttributeValue {
    pub attribute_id: i64,
    pub attribute_code: String,
    pub attribute_name: String,
    pub input_type: String,
    #[serde(flatten)]
    pub data: AttributeValueData,
}

/// One facet filter: value ids of a single attribute, ORed together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub attribute_id: i64,
    pub value_ids: Vec<i64>,
}

/// Facet count row: how many matching products carry a given value
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FacetCount {
    pub attribute_id: i64,
    pub attribute_value_id: i64,
    pub label: String,
    pub product_count: i64,
}
