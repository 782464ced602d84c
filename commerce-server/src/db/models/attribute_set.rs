//! Attribute set models
//!
//! A set is a named bundle of attributes ("Clothing" = Color + Size).
//! Sets are inferred from a product's assigned attributes when none is
//! given explicitly.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::attribute::Attribute;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttributeSet {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// System sets cannot be deleted through the API
    pub is_system: bool,
    pub sort_order: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSetCreate {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    /// Attribute ids to assign on creation
    #[serde(default)]
    pub attribute_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
}

/// Membership row: one attribute inside one set
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttributeSetAssignment {
    pub id: i64,
    pub attribute_set_id: i64,
    pub attribute_id: i64,
    pub sort_order: i64,
    pub is_required: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentCreate {
    pub attribute_id: i64,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_required: bool,
}

/// Set with its member attributes resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSetDetail {
    #[serde(flatten)]
    pub set: AttributeSet,
    pub attributes: Vec<Attribute>,
}
