//! Store models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub owner_user_id: Option<i64>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    pub slug: String,
    pub owner_user_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub owner_user_id: Option<i64>,
    pub status: Option<String>,
}

/// Key/value setting scoped to one store
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreSetting {
    pub id: i64,
    pub store_id: i64,
    pub setting_key: String,
    pub setting_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettingUpsert {
    pub setting_key: String,
    pub setting_value: String,
}
