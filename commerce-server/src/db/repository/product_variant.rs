//! Product variant repository
//!
//! Persisting a variant writes the variant row and its axis values in
//! one transaction.

use super::product_attribute_value::{ValueRow, check_value_shape, fold_grouped};
use super::{RepoError, RepoResult};
use crate::db::models::{
    AttributeAssignment, AttributeValueData, GroupedAttributeValue, ProductVariant,
    VariantAxisValue, VariantCreate, VariantUpdate,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ProductVariantRepository {
    pool: SqlitePool,
}

impl ProductVariantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_product(&self, product_id: i64) -> RepoResult<Vec<ProductVariant>> {
        let variants = sqlx::query_as::<_, ProductVariant>(
            "SELECT * FROM product_variants WHERE product_id = ? ORDER BY sku",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(variants)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<ProductVariant>> {
        let variant =
            sqlx::query_as::<_, ProductVariant>("SELECT * FROM product_variants WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(variant)
    }

    pub async fn find_axis_values(&self, variant_id: i64) -> RepoResult<Vec<VariantAxisValue>> {
        #[derive(sqlx::FromRow)]
        struct AxisRow {
            attribute_id: i64,
            attribute_value_id: i64,
        }
        let rows = sqlx::query_as::<_, AxisRow>(
            "SELECT attribute_id, attribute_value_id \
             FROM product_variant_attribute_values \
             WHERE variant_id = ? AND attribute_value_id IS NOT NULL \
             ORDER BY id",
        )
        .bind(variant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| VariantAxisValue {
                attribute_id: r.attribute_id,
                attribute_value_id: r.attribute_value_id,
            })
            .collect())
    }

    pub async fn create(&self, product_id: i64, data: VariantCreate) -> RepoResult<ProductVariant> {
        let mut tx = self.pool.begin().await?;

        let product: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *tx)
            .await?;
        if product.is_none() {
            return Err(RepoError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        let result = sqlx::query(
            "INSERT INTO product_variants (product_id, sku, name, price_cents, currency) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(product_id)
        .bind(&data.sku)
        .bind(&data.name)
        .bind(data.price_cents)
        .bind(data.currency.as_deref().unwrap_or("USD"))
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for axis in &data.axis_values {
            sqlx::query(
                "INSERT INTO product_variant_attribute_values \
                 (variant_id, attribute_id, attribute_value_id) \
                 VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(axis.attribute_id)
            .bind(axis.attribute_value_id)
            .execute(&mut *tx)
            .await?;
        }

        let variant =
            sqlx::query_as::<_, ProductVariant>("SELECT * FROM product_variants WHERE id = ?")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(variant)
    }

    pub async fn update(&self, id: i64, data: VariantUpdate) -> RepoResult<ProductVariant> {
        sqlx::query(
            "UPDATE product_variants SET \
             name = COALESCE(?, name), \
             price_cents = COALESCE(?, price_cents), \
             currency = COALESCE(?, currency), \
             status = COALESCE(?, status), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(data.price_cents)
        .bind(&data.currency)
        .bind(&data.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Variant {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM product_variants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace all attribute values of a variant in one transaction.
    ///
    /// Same contract as the product-level replace: multiselect
    /// assignments expand into one row per value id, old rows go
    /// first, and a shape mismatch aborts the whole write.
    pub async fn replace_attribute_values(
        &self,
        variant_id: i64,
        assignments: &[AttributeAssignment],
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM product_variants WHERE id = ?")
            .bind(variant_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(RepoError::NotFound(format!(
                "Variant {} not found",
                variant_id
            )));
        }

        sqlx::query("DELETE FROM product_variant_attribute_values WHERE variant_id = ?")
            .bind(variant_id)
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
                    insert_value_row(
                        &mut tx,
                        variant_id,
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
                        insert_value_row(
                            &mut tx,
                            variant_id,
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
                    insert_value_row(
                        &mut tx,
                        variant_id,
                        assignment.attribute_id,
                        None,
                        Some(value.as_str()),
                        None,
                        None,
                    )
                    .await?;
                }
                AttributeValueData::Number { value } => {
                    insert_value_row(
                        &mut tx,
                        variant_id,
                        assignment.attribute_id,
                        None,
                        None,
                        Some(*value),
                        None,
                    )
                    .await?;
                }
                AttributeValueData::Boolean { value } => {
                    insert_value_row(
                        &mut tx,
                        variant_id,
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

    /// Read back a variant's values, one entry per attribute
    pub async fn find_attribute_values(
        &self,
        variant_id: i64,
    ) -> RepoResult<Vec<GroupedAttributeValue>> {
        let rows = sqlx::query_as::<_, ValueRow>(
            "SELECT pvav.attribute_id, a.code AS attribute_code, a.name AS attribute_name, \
                    a.input_type, pvav.attribute_value_id, pvav.value_text, pvav.value_number, \
                    pvav.value_boolean \
             FROM product_variant_attribute_values pvav \
             JOIN attributes a ON a.id = pvav.attribute_id \
             WHERE pvav.variant_id = ? \
             ORDER BY a.code, pvav.id",
        )
        .bind(variant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(fold_grouped(rows))
    }
}

async fn insert_value_row(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    variant_id: i64,
    attribute_id: i64,
    attribute_value_id: Option<i64>,
    value_text: Option<&str>,
    value_number: Option<f64>,
    value_boolean: Option<bool>,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product_variant_attribute_values \
         (variant_id, attribute_id, attribute_value_id, value_text, value_number, value_boolean) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(variant_id)
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
    use crate::db::models::{AttributeCreate, AttributeValueCreate, ProductCreate};
    use crate::db::repository::{AttributeRepository, ProductRepository};
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    async fn make_product(pool: &SqlitePool) -> i64 {
        ProductRepository::new(pool.clone())
            .create(ProductCreate {
                sku: "SHIRT".to_string(),
                name: "Shirt".to_string(),
                description: None,
                price_cents: 1000,
                currency: None,
                status: None,
                product_type: Some("variable".to_string()),
                category_id: None,
                metadata: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn make_axis(pool: &SqlitePool) -> (i64, i64) {
        let repo = AttributeRepository::new(pool.clone());
        let attr = repo
            .create(AttributeCreate {
                code: "color".to_string(),
                name: "Color".to_string(),
                input_type: "select".to_string(),
                data_type: "string".to_string(),
                unit: None,
                values: vec![AttributeValueCreate {
                    value_code: "red".to_string(),
                    label: "Red".to_string(),
                    sort_order: 0,
                }],
            })
            .await
            .unwrap();
        let values = repo.find_values(attr.id).await.unwrap();
        (attr.id, values[0].id)
    }

    #[tokio::test]
    async fn create_persists_axis_values() {
        let pool = setup().await;
        let product_id = make_product(&pool).await;
        let (attribute_id, value_id) = make_axis(&pool).await;

        let repo = ProductVariantRepository::new(pool.clone());
        let variant = repo
            .create(
                product_id,
                VariantCreate {
                    sku: "SHIRT-RED".to_string(),
                    name: "Red".to_string(),
                    price_cents: 1200,
                    currency: None,
                    axis_values: vec![VariantAxisValue {
                        attribute_id,
                        attribute_value_id: value_id,
                    }],
                },
            )
            .await
            .unwrap();
        assert_eq!(variant.currency, "USD");

        let axes = repo.find_axis_values(variant.id).await.unwrap();
        assert_eq!(axes.len(), 1);
        assert_eq!(axes[0].attribute_id, attribute_id);
        assert_eq!(axes[0].attribute_value_id, value_id);
    }

    #[tokio::test]
    async fn create_rejects_unknown_product() {
        let pool = setup().await;
        let repo = ProductVariantRepository::new(pool.clone());
        let result = repo
            .create(
                999,
                VariantCreate {
                    sku: "X".to_string(),
                    name: "X".to_string(),
                    price_cents: 0,
                    currency: None,
                    axis_values: vec![],
                },
            )
            .await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    async fn make_typed_attribute(pool: &SqlitePool, code: &str, input_type: &str) -> i64 {
        let data_type = match input_type {
            "number" => "number",
            "boolean" => "boolean",
            _ => "string",
        };
        AttributeRepository::new(pool.clone())
            .create(AttributeCreate {
                code: code.to_string(),
                name: code.to_string(),
                input_type: input_type.to_string(),
                data_type: data_type.to_string(),
                unit: None,
                values: vec![],
            })
            .await
            .unwrap()
            .id
    }

    async fn make_variant(pool: &SqlitePool, product_id: i64, sku: &str) -> i64 {
        ProductVariantRepository::new(pool.clone())
            .create(
                product_id,
                VariantCreate {
                    sku: sku.to_string(),
                    name: sku.to_string(),
                    price_cents: 1200,
                    currency: None,
                    axis_values: vec![],
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn replace_and_read_back_typed_values() {
        let pool = setup().await;
        let product_id = make_product(&pool).await;
        let variant_id = make_variant(&pool, product_id, "SHIRT-RED").await;
        let (color, red) = make_axis(&pool).await;
        let weight = make_typed_attribute(&pool, "weight", "number").await;
        let organic = make_typed_attribute(&pool, "organic", "boolean").await;

        let repo = ProductVariantRepository::new(pool.clone());
        repo.replace_attribute_values(
            variant_id,
            &[
                AttributeAssignment {
                    attribute_id: weight,
                    data: AttributeValueData::Number { value: 0.25 },
                },
                AttributeAssignment {
                    attribute_id: color,
                    data: AttributeValueData::Selection {
                        attribute_value_id: red,
                    },
                },
                AttributeAssignment {
                    attribute_id: organic,
                    data: AttributeValueData::Boolean { value: true },
                },
            ],
        )
        .await
        .unwrap();

        let grouped = repo.find_attribute_values(variant_id).await.unwrap();
        let codes: Vec<&str> = grouped.iter().map(|g| g.attribute_code.as_str()).collect();
        assert_eq!(codes, vec!["color", "organic", "weight"]);
        assert_eq!(
            grouped[0].data,
            AttributeValueData::Selection {
                attribute_value_id: red
            }
        );
        assert_eq!(grouped[1].data, AttributeValueData::Boolean { value: true });
        assert_eq!(grouped[2].data, AttributeValueData::Number { value: 0.25 });
    }

    #[tokio::test]
    async fn shape_mismatch_rolls_back_the_variant_write() {
        let pool = setup().await;
        let product_id = make_product(&pool).await;
        let variant_id = make_variant(&pool, product_id, "SHIRT-RED").await;
        let weight = make_typed_attribute(&pool, "weight", "number").await;

        let repo = ProductVariantRepository::new(pool.clone());
        repo.replace_attribute_values(
            variant_id,
            &[AttributeAssignment {
                attribute_id: weight,
                data: AttributeValueData::Number { value: 0.25 },
            }],
        )
        .await
        .unwrap();

        // Text on a number attribute fails; the earlier value survives
        let result = repo
            .replace_attribute_values(
                variant_id,
                &[AttributeAssignment {
                    attribute_id: weight,
                    data: AttributeValueData::Text {
                        value: "heavy".to_string(),
                    },
                }],
            )
            .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));

        let grouped = repo.find_attribute_values(variant_id).await.unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].data, AttributeValueData::Number { value: 0.25 });
    }

    #[tokio::test]
    async fn replace_rejects_unknown_variant() {
        let pool = setup().await;
        let repo = ProductVariantRepository::new(pool.clone());
        let result = repo.replace_attribute_values(999, &[]).await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() {
        let pool = setup().await;
        let product_id = make_product(&pool).await;
        let repo = ProductVariantRepository::new(pool.clone());

        let data = VariantCreate {
            sku: "SHIRT-RED".to_string(),
            name: "Red".to_string(),
            price_cents: 1200,
            currency: None,
            axis_values: vec![],
        };
        repo.create(product_id, data.clone()).await.unwrap();
        let result = repo.create(product_id, data).await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }
}
