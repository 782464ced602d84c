//! Attribute set repository
//!
//! Sets and their membership rows. Creation with initial members runs
//! in one transaction.

use super::{RepoError, RepoResult};
use crate::db::models::{
    AssignmentCreate, Attribute, AttributeSet, AttributeSetAssignment, AttributeSetCreate,
    AttributeSetDetail, AttributeSetUpdate,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AttributeSetRepository {
    pool: SqlitePool,
}

impl AttributeSetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Sets by ascending sort_order, then id. Inference walks this
    /// order, so the tie-break decides which set matches first.
    pub async fn find_all(&self) -> RepoResult<Vec<AttributeSet>> {
        let sets = sqlx::query_as::<_, AttributeSet>(
            "SELECT * FROM attribute_sets ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sets)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<AttributeSet>> {
        let set = sqlx::query_as::<_, AttributeSet>("SELECT * FROM attribute_sets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(set)
    }

    /// Set with its member attributes, in assignment order
    pub async fn find_detail(&self, id: i64) -> RepoResult<Option<AttributeSetDetail>> {
        let Some(set) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let attributes = self.find_attributes(id).await?;
        Ok(Some(AttributeSetDetail { set, attributes }))
    }

    pub async fn find_attributes(&self, set_id: i64) -> RepoResult<Vec<Attribute>> {
        let attrs = sqlx::query_as::<_, Attribute>(
            "SELECT a.* FROM attributes a \
             JOIN attribute_set_assignments asa ON asa.attribute_id = a.id \
             WHERE asa.attribute_set_id = ? \
             ORDER BY asa.sort_order, a.code",
        )
        .bind(set_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attrs)
    }

    /// All membership rows, for set inference
    pub async fn find_all_assignments(&self) -> RepoResult<Vec<AttributeSetAssignment>> {
        let rows = sqlx::query_as::<_, AttributeSetAssignment>(
            "SELECT * FROM attribute_set_assignments ORDER BY attribute_set_id, sort_order",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, data: AttributeSetCreate) -> RepoResult<AttributeSet> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO attribute_sets (name, description, sort_order) VALUES (?, ?, ?)",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.sort_order)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for (idx, attribute_id) in data.attribute_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO attribute_set_assignments (attribute_set_id, attribute_id, sort_order) \
                 VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(attribute_id)
            .bind(idx as i64)
            .execute(&mut *tx)
            .await?;
        }

        let set = sqlx::query_as::<_, AttributeSet>("SELECT * FROM attribute_sets WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(set)
    }

    pub async fn update(&self, id: i64, data: AttributeSetUpdate) -> RepoResult<AttributeSet> {
        sqlx::query(
            "UPDATE attribute_sets SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             sort_order = COALESCE(?, sort_order), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.sort_order)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attribute set {} not found", id)))
    }

    /// System sets are protected from deletion
    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let set = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attribute set {} not found", id)))?;
        if set.is_system {
            return Err(RepoError::Validation(format!(
                "Attribute set '{}' is a system set and cannot be deleted",
                set.name
            )));
        }

        let result = sqlx::query("DELETE FROM attribute_sets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn assign_attribute(
        &self,
        set_id: i64,
        data: AssignmentCreate,
    ) -> RepoResult<AttributeSetAssignment> {
        let result = sqlx::query(
            "INSERT INTO attribute_set_assignments \
             (attribute_set_id, attribute_id, sort_order, is_required) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(set_id)
        .bind(data.attribute_id)
        .bind(data.sort_order)
        .bind(data.is_required)
        .execute(&self.pool)
        .await?;

        let row = sqlx::query_as::<_, AttributeSetAssignment>(
            "SELECT * FROM attribute_set_assignments WHERE id = ?",
        )
        .bind(result.last_insert_rowid())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn unassign_attribute(&self, set_id: i64, attribute_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            "DELETE FROM attribute_set_assignments \
             WHERE attribute_set_id = ? AND attribute_id = ?",
        )
        .bind(set_id)
        .bind(attribute_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{AttributeCreate, AttributeSetCreate};
    use crate::db::repository::AttributeRepository;
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    async fn make_attribute(pool: &SqlitePool, code: &str) -> i64 {
        AttributeRepository::new(pool.clone())
            .create(AttributeCreate {
                code: code.to_string(),
                name: code.to_string(),
                input_type: "text".to_string(),
                data_type: "string".to_string(),
                unit: None,
                values: vec![],
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_with_members_keeps_assignment_order() {
        let pool = setup().await;
        let zeta = make_attribute(&pool, "zeta").await;
        let alpha = make_attribute(&pool, "alpha").await;

        let repo = AttributeSetRepository::new(pool.clone());
        let set = repo
            .create(AttributeSetCreate {
                name: "Apparel".to_string(),
                description: None,
                sort_order: 0,
                attribute_ids: vec![zeta, alpha],
            })
            .await
            .unwrap();

        // Assignment order wins over code order
        let attrs = repo.find_attributes(set.id).await.unwrap();
        let codes: Vec<&str> = attrs.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["zeta", "alpha"]);
    }

    #[tokio::test]
    async fn create_with_unknown_member_rolls_back() {
        let pool = setup().await;
        let repo = AttributeSetRepository::new(pool.clone());
        let result = repo
            .create(AttributeSetCreate {
                name: "Broken".to_string(),
                description: None,
                sort_order: 0,
                attribute_ids: vec![999],
            })
            .await;
        assert!(result.is_err());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn system_sets_cannot_be_deleted() {
        let pool = setup().await;
        let repo = AttributeSetRepository::new(pool.clone());
        let set = repo
            .create(AttributeSetCreate {
                name: "Default".to_string(),
                description: None,
                sort_order: 0,
                attribute_ids: vec![],
            })
            .await
            .unwrap();
        sqlx::query("UPDATE attribute_sets SET is_system = 1 WHERE id = ?")
            .bind(set.id)
            .execute(&pool)
            .await
            .unwrap();

        let result = repo.delete(set.id).await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
        assert!(repo.find_by_id(set.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn find_all_breaks_sort_order_ties_by_id() {
        let pool = setup().await;
        let repo = AttributeSetRepository::new(pool.clone());
        // "Zebra" is created first, so it wins the tie despite its name
        for name in ["Zebra", "Apparel"] {
            repo.create(AttributeSetCreate {
                name: name.to_string(),
                description: None,
                sort_order: 0,
                attribute_ids: vec![],
            })
            .await
            .unwrap();
        }

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Zebra", "Apparel"]);
    }

    #[tokio::test]
    async fn unassign_reports_missing_rows() {
        let pool = setup().await;
        let attr = make_attribute(&pool, "color").await;
        let repo = AttributeSetRepository::new(pool.clone());
        let set = repo
            .create(AttributeSetCreate {
                name: "Apparel".to_string(),
                description: None,
                sort_order: 0,
                attribute_ids: vec![attr],
            })
            .await
            .unwrap();

        assert!(repo.unassign_attribute(set.id, attr).await.unwrap());
        assert!(!repo.unassign_attribute(set.id, attr).await.unwrap());
    }
}
