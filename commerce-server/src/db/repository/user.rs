//! User and role repository
//!
//! Role assignment rows are written together with the user in one
//! transaction.

use super::{RepoError, RepoResult};
use crate::db::models::{Role, RoleCreate, User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY email")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO users (email, display_name) VALUES (?, ?)")
            .bind(&data.email)
            .bind(&data.display_name)
            .execute(&mut *tx)
            .await?;
        let id = result.last_insert_rowid();

        for role_id in &data.role_ids {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
                .bind(id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;
        }

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn update(&self, id: i64, data: UserUpdate) -> RepoResult<User> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "UPDATE users SET \
             display_name = COALESCE(?, display_name), \
             status = COALESCE(?, status), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.display_name)
        .bind(&data.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // Replace role assignments when a new list is given
        if let Some(role_ids) = &data.role_ids {
            sqlx::query("DELETE FROM user_roles WHERE user_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for role_id in role_ids {
                sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
                    .bind(id)
                    .bind(role_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Roles
    // =========================================================================

    pub async fn find_roles(&self) -> RepoResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    pub async fn find_roles_for_user(&self, user_id: i64) -> RepoResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT r.* FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ? ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }

    pub async fn create_role(&self, data: RoleCreate) -> RepoResult<Role> {
        let permissions = serde_json::to_string(&data.permissions)
            .map_err(|e| RepoError::Validation(format!("Invalid permissions: {e}")))?;

        let result = sqlx::query("INSERT INTO roles (name, permissions) VALUES (?, ?)")
            .bind(&data.name)
            .bind(&permissions)
            .execute(&self.pool)
            .await?;

        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(role)
    }

    pub async fn delete_role(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
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
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    async fn make_role(pool: &SqlitePool, name: &str) -> i64 {
        UserRepository::new(pool.clone())
            .create_role(RoleCreate {
                name: name.to_string(),
                permissions: vec!["catalog:read".to_string()],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_assigns_roles() {
        let pool = setup().await;
        let editor = make_role(&pool, "editor").await;
        let admin = make_role(&pool, "admin").await;

        let repo = UserRepository::new(pool.clone());
        let user = repo
            .create(UserCreate {
                email: "ana@example.com".to_string(),
                display_name: "Ana".to_string(),
                role_ids: vec![editor, admin],
            })
            .await
            .unwrap();

        let roles = repo.find_roles_for_user(user.id).await.unwrap();
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["admin", "editor"]);
    }

    #[tokio::test]
    async fn create_with_unknown_role_rolls_back() {
        let pool = setup().await;
        let repo = UserRepository::new(pool.clone());
        let result = repo
            .create(UserCreate {
                email: "ana@example.com".to_string(),
                display_name: "Ana".to_string(),
                role_ids: vec![999],
            })
            .await;
        assert!(result.is_err());
        // The user row must not survive the failed assignment
        assert!(
            repo.find_by_email("ana@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = setup().await;
        let repo = UserRepository::new(pool.clone());
        let data = UserCreate {
            email: "ana@example.com".to_string(),
            display_name: "Ana".to_string(),
            role_ids: vec![],
        };
        repo.create(data.clone()).await.unwrap();
        let result = repo.create(data).await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn update_replaces_role_assignments() {
        let pool = setup().await;
        let editor = make_role(&pool, "editor").await;
        let admin = make_role(&pool, "admin").await;

        let repo = UserRepository::new(pool.clone());
        let user = repo
            .create(UserCreate {
                email: "ana@example.com".to_string(),
                display_name: "Ana".to_string(),
                role_ids: vec![editor],
            })
            .await
            .unwrap();

        repo.update(
            user.id,
            UserUpdate {
                display_name: None,
                status: None,
                role_ids: Some(vec![admin]),
            },
        )
        .await
        .unwrap();

        let roles = repo.find_roles_for_user(user.id).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].name, "admin");
    }

    #[tokio::test]
    async fn role_permissions_are_stored_as_json() {
        let pool = setup().await;
        let repo = UserRepository::new(pool.clone());
        let role = repo
            .create_role(RoleCreate {
                name: "editor".to_string(),
                permissions: vec!["catalog:read".to_string(), "catalog:write".to_string()],
            })
            .await
            .unwrap();

        let parsed: Vec<String> = serde_json::from_str(&role.permissions).unwrap();
        assert_eq!(parsed, vec!["catalog:read", "catalog:write"]);
    }
}
