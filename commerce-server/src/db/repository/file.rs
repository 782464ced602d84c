//! File storage repository
//!
//! Metadata only; file bytes are handled by the storage handlers.

use super::{RepoError, RepoResult};
use crate::db::models::{DirectoryCreate, FileDirectory, FileGrant, GrantCreate, StoredFile};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Directories
    // =========================================================================

    pub async fn find_directories(&self, parent_id: Option<i64>) -> RepoResult<Vec<FileDirectory>> {
        let dirs = match parent_id {
            Some(parent_id) => {
                sqlx::query_as::<_, FileDirectory>(
                    "SELECT * FROM file_directories WHERE parent_id = ? ORDER BY name",
                )
                .bind(parent_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, FileDirectory>(
                    "SELECT * FROM file_directories WHERE parent_id IS NULL ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(dirs)
    }

    pub async fn find_directory_by_id(&self, id: i64) -> RepoResult<Option<FileDirectory>> {
        let dir =
            sqlx::query_as::<_, FileDirectory>("SELECT * FROM file_directories WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(dir)
    }

    pub async fn create_directory(&self, data: DirectoryCreate) -> RepoResult<FileDirectory> {
        if let Some(parent_id) = data.parent_id
            && self.find_directory_by_id(parent_id).await?.is_none()
        {
            return Err(RepoError::NotFound(format!(
                "Parent directory {} not found",
                parent_id
            )));
        }

        let result = sqlx::query("INSERT INTO file_directories (name, parent_id) VALUES (?, ?)")
            .bind(&data.name)
            .bind(data.parent_id)
            .execute(&self.pool)
            .await?;

        self.find_directory_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create directory".to_string()))
    }

    pub async fn delete_directory(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM file_directories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Files
    // =========================================================================

    pub async fn find_files(&self, directory_id: Option<i64>) -> RepoResult<Vec<StoredFile>> {
        let files = match directory_id {
            Some(directory_id) => {
                sqlx::query_as::<_, StoredFile>(
                    "SELECT * FROM files WHERE directory_id = ? ORDER BY file_name",
                )
                .bind(directory_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StoredFile>(
                    "SELECT * FROM files WHERE directory_id IS NULL ORDER BY file_name",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(files)
    }

    pub async fn find_file_by_id(&self, id: i64) -> RepoResult<Option<StoredFile>> {
        let file = sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(file)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_file(
        &self,
        directory_id: Option<i64>,
        file_name: &str,
        disk_path: &str,
        mime_type: &str,
        size_bytes: i64,
        uploaded_by: Option<i64>,
    ) -> RepoResult<StoredFile> {
        let result = sqlx::query(
            "INSERT INTO files (directory_id, file_name, disk_path, mime_type, size_bytes, uploaded_by) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(directory_id)
        .bind(file_name)
        .bind(disk_path)
        .bind(mime_type)
        .bind(size_bytes)
        .bind(uploaded_by)
        .execute(&self.pool)
        .await?;

        self.find_file_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to record file".to_string()))
    }

    pub async fn delete_file(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Grants
    // =========================================================================

    pub async fn find_grants(&self, entity_type: &str, entity_id: i64) -> RepoResult<Vec<FileGrant>> {
        let grants = sqlx::query_as::<_, FileGrant>(
            "SELECT * FROM file_grants WHERE entity_type = ? AND entity_id = ? ORDER BY role_id",
        )
        .bind(entity_type)
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(grants)
    }

    pub async fn create_grant(&self, data: GrantCreate) -> RepoResult<FileGrant> {
        if data.entity_type != "file" && data.entity_type != "directory" {
            return Err(RepoError::Validation(format!(
                "Unknown grant entity type '{}'",
                data.entity_type
            )));
        }

        let result = sqlx::query(
            "INSERT INTO file_grants (entity_type, entity_id, role_id, can_read, can_write) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&data.entity_type)
        .bind(data.entity_id)
        .bind(data.role_id)
        .bind(data.can_read)
        .bind(data.can_write)
        .execute(&self.pool)
        .await?;

        let grant = sqlx::query_as::<_, FileGrant>("SELECT * FROM file_grants WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(grant)
    }

    pub async fn delete_grant(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM file_grants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::RoleCreate;
    use crate::db::repository::UserRepository;
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    async fn make_directory(pool: &SqlitePool, name: &str, parent_id: Option<i64>) -> i64 {
        FileRepository::new(pool.clone())
            .create_directory(DirectoryCreate {
                name: name.to_string(),
                parent_id,
            })
            .await
            .unwrap()
            .id
    }

    async fn make_role(pool: &SqlitePool) -> i64 {
        UserRepository::new(pool.clone())
            .create_role(RoleCreate {
                name: "editor".to_string(),
                permissions: vec![],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn directories_are_scoped_to_their_parent() {
        let pool = setup().await;
        let repo = FileRepository::new(pool.clone());
        let root = make_directory(&pool, "images", None).await;
        make_directory(&pool, "logos", Some(root)).await;

        let roots = repo.find_directories(None).await.unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name, "images");

        let children = repo.find_directories(Some(root)).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "logos");
    }

    #[tokio::test]
    async fn duplicate_name_under_one_parent_is_rejected() {
        let pool = setup().await;
        let repo = FileRepository::new(pool.clone());
        let root = make_directory(&pool, "images", None).await;
        make_directory(&pool, "logos", Some(root)).await;

        let result = repo
            .create_directory(DirectoryCreate {
                name: "logos".to_string(),
                parent_id: Some(root),
            })
            .await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn unknown_parent_directory_is_rejected() {
        let pool = setup().await;
        let repo = FileRepository::new(pool.clone());
        let result = repo
            .create_directory(DirectoryCreate {
                name: "logos".to_string(),
                parent_id: Some(999),
            })
            .await;
        assert!(matches!(result, Err(RepoError::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_a_directory_detaches_its_files() {
        let pool = setup().await;
        let repo = FileRepository::new(pool.clone());
        let dir = make_directory(&pool, "images", None).await;
        let file = repo
            .create_file(Some(dir), "logo.png", "ab/cd.png", "image/png", 1024, None)
            .await
            .unwrap();

        assert!(repo.delete_directory(dir).await.unwrap());
        let file = repo.find_file_by_id(file.id).await.unwrap().unwrap();
        assert_eq!(file.directory_id, None);
    }

    #[tokio::test]
    async fn grant_requires_known_entity_type() {
        let pool = setup().await;
        let role_id = make_role(&pool).await;
        let repo = FileRepository::new(pool.clone());
        let result = repo
            .create_grant(GrantCreate {
                entity_type: "bucket".to_string(),
                entity_id: 1,
                role_id,
                can_read: true,
                can_write: false,
            })
            .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_grant_is_rejected() {
        let pool = setup().await;
        let role_id = make_role(&pool).await;
        let dir = make_directory(&pool, "images", None).await;

        let repo = FileRepository::new(pool.clone());
        let data = GrantCreate {
            entity_type: "directory".to_string(),
            entity_id: dir,
            role_id,
            can_read: true,
            can_write: true,
        };
        repo.create_grant(data.clone()).await.unwrap();
        let result = repo.create_grant(data).await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }
}
