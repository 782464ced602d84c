//! File storage models
//!
//! File bytes live on disk under the storage root; these rows carry
//! the metadata, directory tree and role-based access grants.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileDirectory {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryCreate {
    pub name: String,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredFile {
    pub id: i64,
    pub directory_id: Option<i64>,
    pub file_name: String,
    /// Relative path under the storage root
    pub disk_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub uploaded_by: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Role grant on a file or directory
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileGrant {
    pub id: i64,
    /// "file" | "directory"
    pub entity_type: String,
    pub entity_id: i64,
    pub role_id: i64,
    pub can_read: bool,
    pub can_write: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantCreate {
    pub entity_type: String,
    pub entity_id: i64,
    pub role_id: i64,
    #[serde(default = "default_true")]
    pub can_read: bool,
    #[serde(default)]
    pub can_write: bool,
}

fn default_true() -> bool {
    true
}
