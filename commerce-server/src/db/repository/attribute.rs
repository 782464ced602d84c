//! Attribute repository
//!
//! Owns both the attribute definitions and their predefined values.

use super::{RepoError, RepoResult};
use crate::db::models::{
    Attribute, AttributeCreate, AttributeUpdate, AttributeValue, AttributeValueCreate,
    AttributeValueUpdate,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AttributeRepository {
    pool: SqlitePool,
}

impl AttributeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Attribute CRUD
    // =========================================================================

    pub async fn find_all(&self) -> RepoResult<Vec<Attribute>> {
        let attrs = sqlx::query_as::<_, Attribute>("SELECT * FROM attributes ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(attrs)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Attribute>> {
        let attr = sqlx::query_as::<_, Attribute>("SELECT * FROM attributes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(attr)
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Attribute>> {
        let attr = sqlx::query_as::<_, Attribute>("SELECT * FROM attributes WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(attr)
    }

    /// Create an attribute, inserting any initial predefined values in
    /// the same transaction.
    pub async fn create(&self, data: AttributeCreate) -> RepoResult<Attribute> {
        let selectable = data.input_type == "select" || data.input_type == "multiselect";
        if !selectable && !data.values.is_empty() {
            return Err(RepoError::Validation(format!(
                "Attribute '{}' is not selectable and cannot carry predefined values",
                data.code
            )));
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO attributes (code, name, input_type, data_type, unit) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&data.code)
        .bind(&data.name)
        .bind(&data.input_type)
        .bind(&data.data_type)
        .bind(&data.unit)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for value in &data.values {
            sqlx::query(
                "INSERT INTO attribute_values (attribute_id, value_code, label, sort_order) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(id)
            .bind(&value.value_code)
            .bind(&value.label)
            .bind(value.sort_order)
            .execute(&mut *tx)
            .await?;
        }

        let attr = sqlx::query_as::<_, Attribute>("SELECT * FROM attributes WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(attr)
    }

    pub async fn update(&self, id: i64, data: AttributeUpdate) -> RepoResult<Attribute> {
        sqlx::query(
            "UPDATE attributes SET \
             name = COALESCE(?, name), \
             unit = COALESCE(?, unit), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.unit)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attribute {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM attributes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Predefined values
    // =========================================================================

    pub async fn find_values(&self, attribute_id: i64) -> RepoResult<Vec<AttributeValue>> {
        let values = sqlx::query_as::<_, AttributeValue>(
            "SELECT * FROM attribute_values WHERE attribute_id = ? ORDER BY sort_order, id",
        )
        .bind(attribute_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(values)
    }

    pub async fn find_value_by_id(&self, value_id: i64) -> RepoResult<Option<AttributeValue>> {
        let value =
            sqlx::query_as::<_, AttributeValue>("SELECT * FROM attribute_values WHERE id = ?")
                .bind(value_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    pub async fn find_values_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<AttributeValue>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT * FROM attribute_values WHERE id IN ({placeholders}) ORDER BY sort_order, id"
        );
        let mut query = sqlx::query_as::<_, AttributeValue>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    pub async fn add_value(
        &self,
        attribute_id: i64,
        data: AttributeValueCreate,
    ) -> RepoResult<AttributeValue> {
        let attr = self
            .find_by_id(attribute_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attribute {} not found", attribute_id)))?;
        if !attr.is_selectable() {
            return Err(RepoError::Validation(format!(
                "Attribute '{}' is not selectable",
                attr.code
            )));
        }

        let result = sqlx::query(
            "INSERT INTO attribute_values (attribute_id, value_code, label, sort_order) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(attribute_id)
        .bind(&data.value_code)
        .bind(&data.label)
        .bind(data.sort_order)
        .execute(&self.pool)
        .await?;

        self.find_value_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create attribute value".to_string()))
    }

    pub async fn update_value(
        &self,
        value_id: i64,
        data: AttributeValueUpdate,
    ) -> RepoResult<AttributeValue> {
        sqlx::query(
            "UPDATE attribute_values SET \
             label = COALESCE(?, label), \
             sort_order = COALESCE(?, sort_order), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.label)
        .bind(data.sort_order)
        .bind(value_id)
        .execute(&self.pool)
        .await?;

        self.find_value_by_id(value_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attribute value {} not found", value_id)))
    }

    pub async fn delete_value(&self, value_id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM attribute_values WHERE id = ?")
            .bind(value_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
