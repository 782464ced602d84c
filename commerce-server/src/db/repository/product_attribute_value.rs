//! Product attribute value repository
//!
//! Normalized storage of typed attribute values plus the two read
//! paths built on top of it: grouped reads for the product form and
//! set-based filtering/facet counts for search.

use super::{RepoError, RepoResult};
use crate::db::models::{
    AttributeAssignment, AttributeFilter, AttributeValueData, FacetCount, GroupedAttributeValue,
};
use sqlx::SqlitePool;

/// Joined row used by the grouped read paths (products and variants
/// share the same value-table shape)
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ValueRow {
    pub(super) attribute_id: i64,
    pub(super) attribute_code: String,
    pub(super) attribute_name: String,
    pub(super) input_type: String,
    pub(super) attribute_value_id: Option<i64>,
    pub(super) value_text: Option<String>,
    pub(super) value_number: Option<f64>,
    pub(super) value_boolean: Option<bool>,
}

#[derive(Clone)]
pub struct ProductAttributeValueRepository {
    pool: SqlitePool,
}

impl ProductAttributeValueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Replace all attribute values of a product in one transaction.
    ///
    /// Multiselect assignments expand into one row per selected value
    /// id; the old rows are removed first so the write is idempotent.
    pub async fn replace_for_product(
        &self,
        product_id: i64,
        assignments: &[AttributeAssignment],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(RepoError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        sqlx::query("DELETE FROM product_attribute_values WHERE product_id = ?")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        for assignment in assignments {
            let input_type: Option<String> =
                sqlx::query_scalar("SELECT input_type FROM attributes WHERE id = ?")
                    .bind(assignment.attribute_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let input_type = input_type.ok_or_else(|| {
                RepoError::NotFound(format!("Attribute {} not found", assignment.attribute_id))
            })?;
            check_value_shape(&input_type, &assignment.data, assignment.attribute_id)?;

            match &assignment.data {
                AttributeValueData::Selection { attribute_value_id } => {
                    insert_row(
                        &mut tx,
                        product_id,
                        assignment.attribute_id,
                        Some(*attribute_value_id),
                        None,
                        None,
                        None,
                    )
                    .await?;
                }
                AttributeValueData::Selections {
                    attribute_value_ids,
                } => {
                    for value_id in attribute_value_ids {
                        insert_row(
                            &mut tx,
                            product_id,
                            assignment.attribute_id,
                            Some(*value_id),
                            None,
                            None,
                            None,
                        )
                        .await?;
                    }
                }
                AttributeValueData::Text { value } => {
                    insert_row(
                        &mut tx,
                        product_id,
                        assignment.attribute_id,
                        None,
                        Some(value.as_str()),
                        None,
                        None,
                    )
                    .await?;
                }
                AttributeValueData::Number { value } => {
                    insert_row(
                        &mut tx,
                        product_id,
                        assignment.attribute_id,
                        None,
                        None,
                        Some(*value),
                        None,
                    )
                    .await?;
                }
                AttributeValueData::Boolean { value } => {
                    insert_row(
                        &mut tx,
                        product_id,
                        assignment.attribute_id,
                        None,
                        None,
                        None,
                        Some(*value),
                    )
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Read back a product's values, one entry per attribute.
    ///
    /// Multiselect rows are folded into a single `Selections` entry in
    /// row insertion order.
    pub async fn find_grouped(&self, product_id: i64) -> RepoResult<Vec<GroupedAttributeValue>> {
        let rows = sqlx::query_as::<_, ValueRow>(
            "SELECT pav.attribute_id, a.code AS attribute_code, a.name AS attribute_name, \
                    a.input_type, pav.attribute_value_id, pav.value_text, pav.value_number, \
                    pav.value_boolean \
             FROM product_attribute_values pav \
             JOIN attributes a ON a.id = pav.attribute_id \
             WHERE pav.product_id = ? \
             ORDER BY a.code, pav.id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fold_grouped(rows))
    }

    /// Attribute ids a product currently carries (for set inference)
    pub async fn find_attribute_ids(&self, product_id: i64) -> RepoResult<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT attribute_id FROM product_attribute_values WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Product ids matching every filter.
    ///
    /// Each filter contributes one subquery (value ids ORed via IN);
    /// the subqueries are ANDed with INTERSECT.
    pub async fn filter_product_ids(&self, filters: &[AttributeFilter]) -> RepoResult<Vec<i64>> {
        if filters.is_empty() {
            return Err(RepoError::Validation(
                "At least one attribute filter is required".to_string(),
            ));
        }
        for filter in filters {
            if filter.value_ids.is_empty() {
                return Err(RepoError::Validation(format!(
                    "Filter on attribute {} has no value ids",
                    filter.attribute_id
                )));
            }
        }

        let subqueries: Vec<String> = filters
            .iter()
            .map(|f| {
                let placeholders = vec!["?"; f.value_ids.len()].join(", ");
                format!(
                    "SELECT product_id FROM product_attribute_values \
                     WHERE attribute_id = ? AND attribute_value_id IN ({placeholders})"
                )
            })
            .collect();
        let sql = subqueries.join(" INTERSECT ");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for filter in filters {
            query = query.bind(filter.attribute_id);
            for value_id in &filter.value_ids {
                query = query.bind(value_id);
            }
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Facet counts: distinct products per (attribute, value), most
    /// popular first, label as tie-breaker. Zero-count rows are
    /// dropped. Optionally restricted to a pre-filtered product set.
    pub async fn facet_counts(&self, restrict_ids: Option<&[i64]>) -> RepoResult<Vec<FacetCount>> {
        let mut sql = String::from(
            "SELECT pav.attribute_id, pav.attribute_value_id, av.label, \
                    COUNT(DISTINCT pav.product_id) AS product_count \
             FROM product_attribute_values pav \
             JOIN attribute_values av ON av.id = pav.attribute_value_id \
             WHERE pav.attribute_value_id IS NOT NULL",
        );

        if let Some(ids) = restrict_ids {
            if ids.is_empty() {
                return Ok(vec![]);
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" AND pav.product_id IN ({placeholders})"));
        }
        sql.push_str(
            " GROUP BY pav.attribute_id, pav.attribute_value_id, av.label \
              HAVING product_count > 0 \
              ORDER BY product_count DESC, av.label ASC",
        );

        let mut query = sqlx::query_as::<_, FacetCount>(&sql);
        if let Some(ids) = restrict_ids {
            for id in ids {
                query = query.bind(id);
            }
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}

/// Fold sorted value rows into one entry per attribute, multiselect
/// rows collected into a single `Selections` value.
pub(super) fn fold_grouped(rows: Vec<ValueRow>) -> Vec<GroupedAttributeValue> {
    let mut grouped: Vec<GroupedAttributeValue> = Vec::new();
    for row in rows {
        if let Some(last) = grouped.last_mut()
            && last.attribute_id == row.attribute_id
        {
            // Additional row of a multiselect attribute
            if let (
                AttributeValueData::Selections {
                    attribute_value_ids,
                },
                Some(value_id),
            ) = (&mut last.data, row.attribute_value_id)
            {
                attribute_value_ids.push(value_id);
            }
            continue;
        }

        let data = match row.input_type.as_str() {
            "multiselect" => AttributeValueData::Selections {
                attribute_value_ids: row.attribute_value_id.into_iter().collect(),
            },
            "select" => AttributeValueData::Selection {
                attribute_value_id: row.attribute_value_id.unwrap_or_default(),
            },
            "number" => AttributeValueData::Number {
                value: row.value_number.unwrap_or_default(),
            },
            "boolean" => AttributeValueData::Boolean {
                value: row.value_boolean.unwrap_or_default(),
            },
            _ => AttributeValueData::Text {
                value: row.value_text.unwrap_or_default(),
            },
        };
        grouped.push(GroupedAttributeValue {
            attribute_id: row.attribute_id,
            attribute_code: row.attribute_code,
            attribute_name: row.attribute_name,
            input_type: row.input_type,
            data,
        });
    }
    grouped
}

pub(super) fn check_value_shape(
    input_type: &str,
    data: &AttributeValueData,
    attribute_id: i64,
) -> RepoResult<()> {
    let ok = matches!(
        (input_type, data),
        ("select", AttributeValueData::Selection { .. })
            | ("multiselect", AttributeValueData::Selections { .. })
            | ("multiselect", AttributeValueData::Selection { .. })
            | ("text", AttributeValueData::Text { .. })
            | ("number", AttributeValueData::Number { .. })
            | ("boolean", AttributeValueData::Boolean { .. })
    );
    if ok {
        Ok(())
    } else {
        Err(RepoError::Validation(format!(
            "Value shape does not match input type '{input_type}' of attribute {attribute_id}"
        )))
    }
}

async fn insert_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    product_id: i64,
    attribute_id: i64,
    attribute_value_id: Option<i64>,
    value_text: Option<&str>,
    value_number: Option<f64>,
    value_boolean: Option<bool>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product_attribute_values \
         (product_id, attribute_id, attribute_value_id, value_text, value_number, value_boolean) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(product_id)
    .bind(attribute_id)
    .bind(attribute_value_id)
    .bind(value_text)
    .bind(value_number)
    .bind(value_boolean)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{
        Attribute, AttributeCreate, AttributeValueCreate, ProductCreate,
    };
    use crate::db::repository::{AttributeRepository, ProductRepository};
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    async fn make_attribute(
        pool: &SqlitePool,
        code: &str,
        input_type: &str,
        data_type: &str,
        labels: &[&str],
    ) -> Attribute {
        let repo = AttributeRepository::new(pool.clone());
        repo.create(AttributeCreate {
            code: code.to_string(),
            name: code.to_string(),
            input_type: input_type.to_string(),
            data_type: data_type.to_string(),
            unit: None,
            values: labels
                .iter()
                .enumerate()
                .map(|(i, label)| AttributeValueCreate {
                    value_code: label.to_lowercase(),
                    label: label.to_string(),
                    sort_order: i as i64,
                })
                .collect(),
        })
        .await
        .unwrap()
    }

    async fn make_product(pool: &SqlitePool, sku: &str) -> i64 {
        let repo = ProductRepository::new(pool.clone());
        repo.create(ProductCreate {
            sku: sku.to_string(),
            name: sku.to_string(),
            description: None,
            price_cents: 1000,
            currency: None,
            status: None,
            product_type: None,
            category_id: None,
            metadata: None,
        })
        .await
        .unwrap()
        .id
    }

    async fn value_ids(pool: &SqlitePool, attribute_id: i64) -> Vec<i64> {
        AttributeRepository::new(pool.clone())
            .find_values(attribute_id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.id)
            .collect()
    }

    #[tokio::test]
    async fn replace_and_read_back_all_shapes() {
        let pool = setup().await;
        let color = make_attribute(&pool, "color", "select", "string", &["Red", "Blue"]).await;
        let tags =
            make_attribute(&pool, "tags", "multiselect", "string", &["New", "Sale", "Eco"]).await;
        let weight = make_attribute(&pool, "weight", "number", "number", &[]).await;
        let organic = make_attribute(&pool, "organic", "boolean", "boolean", &[]).await;
        let note = make_attribute(&pool, "note", "text", "string", &[]).await;
        let product_id = make_product(&pool, "SKU-1").await;

        let color_ids = value_ids(&pool, color.id).await;
        let tag_ids = value_ids(&pool, tags.id).await;

        let repo = ProductAttributeValueRepository::new(pool.clone());
        repo.replace_for_product(
            product_id,
            &[
                AttributeAssignment {
                    attribute_id: color.id,
                    data: AttributeValueData::Selection {
                        attribute_value_id: color_ids[0],
                    },
                },
                AttributeAssignment {
                    attribute_id: tags.id,
                    data: AttributeValueData::Selections {
                        attribute_value_ids: vec![tag_ids[0], tag_ids[2]],
                    },
                },
                AttributeAssignment {
                    attribute_id: weight.id,
                    data: AttributeValueData::Number { value: 1.5 },
                },
                AttributeAssignment {
                    attribute_id: organic.id,
                    data: AttributeValueData::Boolean { value: true },
                },
                AttributeAssignment {
                    attribute_id: note.id,
                    data: AttributeValueData::Text {
                        value: "handmade".to_string(),
                    },
                },
            ],
        )
        .await
        .unwrap();

        let grouped = repo.find_grouped(product_id).await.unwrap();
        assert_eq!(grouped.len(), 5);

        // Ordered by attribute code
        let codes: Vec<&str> = grouped.iter().map(|g| g.attribute_code.as_str()).collect();
        assert_eq!(codes, vec!["color", "note", "organic", "tags", "weight"]);

        let tags_entry = grouped.iter().find(|g| g.attribute_id == tags.id).unwrap();
        match &tags_entry.data {
            AttributeValueData::Selections {
                attribute_value_ids,
            } => assert_eq!(attribute_value_ids, &vec![tag_ids[0], tag_ids[2]]),
            other => panic!("expected Selections, got {:?}", other),
        }

        let weight_entry = grouped.iter().find(|g| g.attribute_id == weight.id).unwrap();
        assert!(matches!(
            weight_entry.data,
            AttributeValueData::Number { value } if value == 1.5
        ));
    }

    #[tokio::test]
    async fn replace_is_idempotent() {
        let pool = setup().await;
        let color = make_attribute(&pool, "color", "select", "string", &["Red", "Blue"]).await;
        let product_id = make_product(&pool, "SKU-1").await;
        let ids = value_ids(&pool, color.id).await;

        let repo = ProductAttributeValueRepository::new(pool.clone());
        for value_id in [ids[0], ids[1]] {
            repo.replace_for_product(
                product_id,
                &[AttributeAssignment {
                    attribute_id: color.id,
                    data: AttributeValueData::Selection {
                        attribute_value_id: value_id,
                    },
                }],
            )
            .await
            .unwrap();
        }

        let grouped = repo.find_grouped(product_id).await.unwrap();
        assert_eq!(grouped.len(), 1);
        assert!(matches!(
            grouped[0].data,
            AttributeValueData::Selection { attribute_value_id } if attribute_value_id == ids[1]
        ));
    }

    #[tokio::test]
    async fn shape_mismatch_rolls_back_the_whole_write() {
        let pool = setup().await;
        let color = make_attribute(&pool, "color", "select", "string", &["Red"]).await;
        let weight = make_attribute(&pool, "weight", "number", "number", &[]).await;
        let product_id = make_product(&pool, "SKU-1").await;
        let ids = value_ids(&pool, color.id).await;

        let repo = ProductAttributeValueRepository::new(pool.clone());
        let result = repo
            .replace_for_product(
                product_id,
                &[
                    AttributeAssignment {
                        attribute_id: color.id,
                        data: AttributeValueData::Selection {
                            attribute_value_id: ids[0],
                        },
                    },
                    // Text payload on a number attribute
                    AttributeAssignment {
                        attribute_id: weight.id,
                        data: AttributeValueData::Text {
                            value: "heavy".to_string(),
                        },
                    },
                ],
            )
            .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));

        // The valid first assignment must not have been persisted
        assert!(repo.find_grouped(product_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_rejects_unknown_product() {
        let pool = setup().await;
        let repo = ProductAttributeValueRepository::new(pool.clone());
        let result = repo.replace_for_product(999, &[]).await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn filters_and_across_attributes_or_within_one() {
        let pool = setup().await;
        let color = make_attribute(&pool, "color", "select", "string", &["Red", "Blue"]).await;
        let size = make_attribute(&pool, "size", "select", "string", &["S", "M"]).await;
        let color_ids = value_ids(&pool, color.id).await;
        let size_ids = value_ids(&pool, size.id).await;

        let repo = ProductAttributeValueRepository::new(pool.clone());
        // p1: Red/S, p2: Red/M, p3: Blue/M
        let mut products = Vec::new();
        for (sku, color_id, size_id) in [
            ("P1", color_ids[0], size_ids[0]),
            ("P2", color_ids[0], size_ids[1]),
            ("P3", color_ids[1], size_ids[1]),
        ] {
            let id = make_product(&pool, sku).await;
            repo.replace_for_product(
                id,
                &[
                    AttributeAssignment {
                        attribute_id: color.id,
                        data: AttributeValueData::Selection {
                            attribute_value_id: color_id,
                        },
                    },
                    AttributeAssignment {
                        attribute_id: size.id,
                        data: AttributeValueData::Selection {
                            attribute_value_id: size_id,
                        },
                    },
                ],
            )
            .await
            .unwrap();
            products.push(id);
        }

        // Red AND M -> p2 only
        let ids = repo
            .filter_product_ids(&[
                AttributeFilter {
                    attribute_id: color.id,
                    value_ids: vec![color_ids[0]],
                },
                AttributeFilter {
                    attribute_id: size.id,
                    value_ids: vec![size_ids[1]],
                },
            ])
            .await
            .unwrap();
        assert_eq!(ids, vec![products[1]]);

        // (Red OR Blue) AND M -> p2, p3
        let mut ids = repo
            .filter_product_ids(&[
                AttributeFilter {
                    attribute_id: color.id,
                    value_ids: vec![color_ids[0], color_ids[1]],
                },
                AttributeFilter {
                    attribute_id: size.id,
                    value_ids: vec![size_ids[1]],
                },
            ])
            .await
            .unwrap();
        ids.sort();
        assert_eq!(ids, vec![products[1], products[2]]);

        // No product is both Blue and S
        let ids = repo
            .filter_product_ids(&[
                AttributeFilter {
                    attribute_id: color.id,
                    value_ids: vec![color_ids[1]],
                },
                AttributeFilter {
                    attribute_id: size.id,
                    value_ids: vec![size_ids[0]],
                },
            ])
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn empty_filters_are_rejected() {
        let pool = setup().await;
        let repo = ProductAttributeValueRepository::new(pool.clone());
        assert!(matches!(
            repo.filter_product_ids(&[]).await,
            Err(RepoError::Validation(_))
        ));
        assert!(matches!(
            repo.filter_product_ids(&[AttributeFilter {
                attribute_id: 1,
                value_ids: vec![],
            }])
            .await,
            Err(RepoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn facet_counts_order_and_restriction() {
        let pool = setup().await;
        let color = make_attribute(&pool, "color", "select", "string", &["Red", "Blue"]).await;
        let color_ids = value_ids(&pool, color.id).await;

        let repo = ProductAttributeValueRepository::new(pool.clone());
        // Red on two products, Blue on one
        let mut products = Vec::new();
        for (sku, value_id) in [
            ("P1", color_ids[0]),
            ("P2", color_ids[0]),
            ("P3", color_ids[1]),
        ] {
            let id = make_product(&pool, sku).await;
            repo.replace_for_product(
                id,
                &[AttributeAssignment {
                    attribute_id: color.id,
                    data: AttributeValueData::Selection {
                        attribute_value_id: value_id,
                    },
                }],
            )
            .await
            .unwrap();
            products.push(id);
        }

        let facets = repo.facet_counts(None).await.unwrap();
        assert_eq!(facets.len(), 2);
        assert_eq!(facets[0].label, "Red");
        assert_eq!(facets[0].product_count, 2);
        assert_eq!(facets[1].label, "Blue");
        assert_eq!(facets[1].product_count, 1);

        // Restricting to the Blue product drops the Red facet entirely
        let facets = repo.facet_counts(Some(&[products[2]])).await.unwrap();
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].label, "Blue");

        // Empty restriction short-circuits to no facets
        assert!(repo.facet_counts(Some(&[])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn facet_ties_break_on_label() {
        let pool = setup().await;
        let color = make_attribute(&pool, "color", "select", "string", &["Zinc", "Amber"]).await;
        let color_ids = value_ids(&pool, color.id).await;

        let repo = ProductAttributeValueRepository::new(pool.clone());
        for (sku, value_id) in [("P1", color_ids[0]), ("P2", color_ids[1])] {
            let id = make_product(&pool, sku).await;
            repo.replace_for_product(
                id,
                &[AttributeAssignment {
                    attribute_id: color.id,
                    data: AttributeValueData::Selection {
                        attribute_value_id: value_id,
                    },
                }],
            )
            .await
            .unwrap();
        }

        let facets = repo.facet_counts(None).await.unwrap();
        let labels: Vec<&str> = facets.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Amber", "Zinc"]);
    }
}
