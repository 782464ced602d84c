//! Variant generation
//!
//! Cartesian product over the select-attribute axes of a product.

use serde::{Deserialize, Serialize};

use crate::db::models::{GeneratedVariant, VariantAxisValue};

/// One selectable value on an axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisValue {
    pub attribute_value_id: i64,
    pub label: String,
}

/// One generation axis: a select attribute with its candidate values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantAxis {
    pub attribute_id: i64,
    pub values: Vec<AxisValue>,
}

/// Generate every combination across the axes.
///
/// The first axis varies slowest, so two axes Color(Red, Blue) and
/// Size(S, M) yield "Red / S", "Red / M", "Blue / S", "Blue / M".
/// No axes, or any axis without values, yields no variants.
pub fn generate_variants(axes: &[VariantAxis]) -> Vec<GeneratedVariant> {
    if axes.is_empty() || axes.iter().any(|a| a.values.is_empty()) {
        return vec![];
    }

    let mut combos: Vec<GeneratedVariant> = vec![GeneratedVariant {
        name: String::new(),
        axis_values: vec![],
    }];

    for axis in axes {
        let mut next = Vec::with_capacity(combos.len() * axis.values.len());
        for combo in &combos {
            for value in &axis.values {
                let name = if combo.name.is_empty() {
                    value.label.clone()
                } else {
                    format!("{} / {}", combo.name, value.label)
                };
                let mut axis_values = combo.axis_values.clone();
                axis_values.push(VariantAxisValue {
                    attribute_id: axis.attribute_id,
                    attribute_value_id: value.attribute_value_id,
                });
                next.push(GeneratedVariant { name, axis_values });
            }
        }
        combos = next;
    }

    combos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(attribute_id: i64, values: &[(i64, &str)]) -> VariantAxis {
        VariantAxis {
            attribute_id,
            values: values
                .iter()
                .map(|(id, label)| AxisValue {
                    attribute_value_id: *id,
                    label: label.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn two_axes_give_the_full_product() {
        let axes = vec![
            axis(1, &[(10, "Red"), (11, "Blue")]),
            axis(2, &[(20, "S"), (21, "M")]),
        ];
        let variants = generate_variants(&axes);
        let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Red / S", "Red / M", "Blue / S", "Blue / M"]);
        assert_eq!(
            variants[0].axis_values,
            vec![
                VariantAxisValue {
                    attribute_id: 1,
                    attribute_value_id: 10,
                },
                VariantAxisValue {
                    attribute_id: 2,
                    attribute_value_id: 20,
                },
            ]
        );
    }

    #[test]
    fn count_is_product_of_axis_sizes() {
        let axes = vec![
            axis(1, &[(1, "a"), (2, "b"), (3, "c")]),
            axis(2, &[(4, "x"), (5, "y")]),
            axis(3, &[(6, "1"), (7, "2"), (8, "3"), (9, "4")]),
        ];
        assert_eq!(generate_variants(&axes).len(), 3 * 2 * 4);
    }

    #[test]
    fn single_axis_passes_through() {
        let axes = vec![axis(1, &[(10, "Red"), (11, "Blue")])];
        let variants = generate_variants(&axes);
        let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Blue"]);
    }

    #[test]
    fn no_axes_yield_no_variants() {
        assert!(generate_variants(&[]).is_empty());
    }

    #[test]
    fn empty_axis_yields_no_variants() {
        let axes = vec![axis(1, &[(10, "Red")]), axis(2, &[])];
        assert!(generate_variants(&axes).is_empty());
    }
}
