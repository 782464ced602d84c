//! Category repository

use super::{RepoError, RepoResult};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let cats =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY sort_order, name")
                .fetch_all(&self.pool)
                .await?;
        Ok(cats)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Category>> {
        let cat = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cat)
    }

    pub async fn find_children(&self, parent_id: i64) -> RepoResult<Vec<Category>> {
        let cats = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE parent_id = ? ORDER BY sort_order, name",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cats)
    }

    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        if let Some(parent_id) = data.parent_id
            && self.find_by_id(parent_id).await?.is_none()
        {
            return Err(RepoError::NotFound(format!(
                "Parent category {} not found",
                parent_id
            )));
        }

        let result = sqlx::query(
            "INSERT INTO categories (name, slug, description, parent_id, sort_order) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.description)
        .bind(data.parent_id)
        .bind(data.sort_order)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    pub async fn update(&self, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
        // A category must not become its own parent
        if data.parent_id == Some(id) {
            return Err(RepoError::Validation(
                "Category cannot be its own parent".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE categories SET \
             name = COALESCE(?, name), \
             slug = COALESCE(?, slug), \
             description = COALESCE(?, description), \
             parent_id = COALESCE(?, parent_id), \
             sort_order = COALESCE(?, sort_order), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(&data.description)
        .bind(data.parent_id)
        .bind(data.sort_order)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
