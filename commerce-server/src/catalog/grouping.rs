//! Value grouping and attribute set inference

use serde::{Deserialize, Serialize};

/// One attribute with its accumulated value ids, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueGroup {
    pub attribute_id: i64,
    pub attribute_value_ids: Vec<i64>,
}

/// Outcome of attribute set inference
///
/// The grouped values are carried in both arms so callers never lose
/// them when no set matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SetInference {
    Matched {
        set_id: i64,
        values: Vec<ValueGroup>,
    },
    Unmatched {
        values: Vec<ValueGroup>,
    },
}

impl SetInference {
    pub fn set_id(&self) -> Option<i64> {
        match self {
            Self::Matched { set_id, .. } => Some(*set_id),
            Self::Unmatched { .. } => None,
        }
    }

    pub fn values(&self) -> &[ValueGroup] {
        match self {
            Self::Matched { values, .. } | Self::Unmatched { values } => values,
        }
    }
}

/// Fold flat (attribute_id, value_id) pairs into one group per
/// attribute. Attribute order follows first appearance; value order
/// inside a group follows input order. Duplicate pairs collapse.
pub fn group_value_ids(pairs: &[(i64, i64)]) -> Vec<ValueGroup> {
    let mut groups: Vec<ValueGroup> = Vec::new();
    for &(attribute_id, value_id) in pairs {
        match groups.iter_mut().find(|g| g.attribute_id == attribute_id) {
            Some(group) => {
                if !group.attribute_value_ids.contains(&value_id) {
                    group.attribute_value_ids.push(value_id);
                }
            }
            None => groups.push(ValueGroup {
                attribute_id,
                attribute_value_ids: vec![value_id],
            }),
        }
    }
    groups
}

/// Infer the attribute set for a product's grouped values.
///
/// Sets are tried in the given order; the first one whose attribute
/// list covers every grouped attribute wins. A product with no values
/// never matches.
pub fn infer_set(values: Vec<ValueGroup>, sets: &[(i64, Vec<i64>)]) -> SetInference {
    if values.is_empty() {
        return SetInference::Unmatched { values };
    }

    for (set_id, attribute_ids) in sets {
        if values
            .iter()
            .all(|g| attribute_ids.contains(&g.attribute_id))
        {
            return SetInference::Matched {
                set_id: *set_id,
                values,
            };
        }
    }
    SetInference::Unmatched { values }
}
