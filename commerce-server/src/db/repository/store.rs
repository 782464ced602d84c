//! Store repository
//!
//! Creating a store seeds its default settings in the same
//! transaction, so a store row never exists without them.

use super::{RepoError, RepoResult};
use crate::db::models::{Store, StoreCreate, StoreSetting, StoreSettingUpsert, StoreUpdate};
use sqlx::SqlitePool;

/// Settings every new store starts with
const DEFAULT_SETTINGS: [(&str, &str); 4] = [
    ("currency", "USD"),
    ("timezone", "UTC"),
    ("auto_approve_products", "false"),
    ("allow_custom_attributes", "true"),
];

#[derive(Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Store>> {
        let stores = sqlx::query_as::<_, Store>("SELECT * FROM stores ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(stores)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(store)
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(store)
    }

    pub async fn create(&self, data: StoreCreate) -> RepoResult<Store> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO stores (name, slug, owner_user_id) VALUES (?, ?, ?)")
            .bind(&data.name)
            .bind(&data.slug)
            .bind(data.owner_user_id)
            .execute(&mut *tx)
            .await?;
        let id = result.last_insert_rowid();

        for (key, value) in DEFAULT_SETTINGS {
            sqlx::query(
                "INSERT INTO store_settings (store_id, setting_key, setting_value) \
                 VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(store)
    }

    pub async fn update(&self, id: i64, data: StoreUpdate) -> RepoResult<Store> {
        sqlx::query(
            "UPDATE stores SET \
             name = COALESCE(?, name), \
             slug = COALESCE(?, slug), \
             owner_user_id = COALESCE(?, owner_user_id), \
             status = COALESCE(?, status), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.slug)
        .bind(data.owner_user_id)
        .bind(&data.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Store {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub async fn find_settings(&self, store_id: i64) -> RepoResult<Vec<StoreSetting>> {
        let settings = sqlx::query_as::<_, StoreSetting>(
            "SELECT * FROM store_settings WHERE store_id = ? ORDER BY setting_key",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(settings)
    }

    pub async fn upsert_setting(
        &self,
        store_id: i64,
        data: StoreSettingUpsert,
    ) -> RepoResult<StoreSetting> {
        if self.find_by_id(store_id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Store {} not found", store_id)));
        }

        sqlx::query(
            "INSERT INTO store_settings (store_id, setting_key, setting_value) VALUES (?, ?, ?) \
             ON CONFLICT (store_id, setting_key) DO UPDATE SET setting_value = excluded.setting_value",
        )
        .bind(store_id)
        .bind(&data.setting_key)
        .bind(&data.setting_value)
        .execute(&self.pool)
        .await?;

        let setting = sqlx::query_as::<_, StoreSetting>(
            "SELECT * FROM store_settings WHERE store_id = ? AND setting_key = ?",
        )
        .bind(store_id)
        .bind(&data.setting_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(setting)
    }

    pub async fn delete_setting(&self, store_id: i64, key: &str) -> RepoResult<bool> {
        let result =
            sqlx::query("DELETE FROM store_settings WHERE store_id = ? AND setting_key = ?")
                .bind(store_id)
                .bind(key)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
