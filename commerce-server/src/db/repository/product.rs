//! Product repository

use super::{RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductSearchRequest, ProductUpdate};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE sku = ?")
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let result = sqlx::query(
            "INSERT INTO products \
             (sku, name, description, price_cents, currency, status, product_type, category_id, metadata) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&data.sku)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(data.currency.as_deref().unwrap_or("USD"))
        .bind(data.status.as_deref().unwrap_or("draft"))
        .bind(data.product_type.as_deref().unwrap_or("simple"))
        .bind(data.category_id)
        .bind(&data.metadata)
        .execute(&self.pool)
        .await?;

        self.find_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    pub async fn update(&self, id: i64, data: ProductUpdate) -> RepoResult<Product> {
        sqlx::query(
            "UPDATE products SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             price_cents = COALESCE(?, price_cents), \
             currency = COALESCE(?, currency), \
             status = COALESCE(?, status), \
             product_type = COALESCE(?, product_type), \
             category_id = COALESCE(?, category_id), \
             metadata = COALESCE(?, metadata), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price_cents)
        .bind(&data.currency)
        .bind(&data.status)
        .bind(&data.product_type)
        .bind(data.category_id)
        .bind(&data.metadata)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Page through products, optionally restricted to a pre-filtered
    /// id list (facet search) plus category/status filters.
    pub async fn search(
        &self,
        req: &ProductSearchRequest,
        restrict_ids: Option<&[i64]>,
    ) -> RepoResult<Vec<Product>> {
        let mut sql = String::from("SELECT * FROM products WHERE 1 = 1");

        if let Some(ids) = restrict_ids {
            if ids.is_empty() {
                return Ok(vec![]);
            }
            let placeholders = vec!["?"; ids.len()].join(", ");
            sql.push_str(&format!(" AND id IN ({placeholders})"));
        }
        if req.category_id.is_some() {
            sql.push_str(" AND category_id = ?");
        }
        if req.status.is_some() {
            sql.push_str(" AND status = ?");
        }
        sql.push_str(" ORDER BY name LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, Product>(&sql);
        if let Some(ids) = restrict_ids {
            for id in ids {
                query = query.bind(id);
            }
        }
        if let Some(category_id) = req.category_id {
            query = query.bind(category_id);
        }
        if let Some(status) = &req.status {
            query = query.bind(status);
        }
        query = query.bind(req.limit.clamp(1, 500)).bind(req.offset.max(0));

        Ok(query.fetch_all(&self.pool).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    fn product(sku: &str, status: &str) -> ProductCreate {
        ProductCreate {
            sku: sku.to_string(),
            name: sku.to_string(),
            description: None,
            price_cents: 1000,
            currency: None,
            status: Some(status.to_string()),
            product_type: None,
            category_id: None,
            metadata: None,
        }
    }

    fn search_request() -> ProductSearchRequest {
        ProductSearchRequest {
            filters: vec![],
            category_id: None,
            status: None,
            limit: 50,
            offset: 0,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let repo = ProductRepository::new(DbService::in_memory().await.unwrap().pool);
        let created = repo
            .create(ProductCreate {
                sku: "SKU-1".to_string(),
                name: "Widget".to_string(),
                description: None,
                price_cents: 500,
                currency: None,
                status: None,
                product_type: None,
                category_id: None,
                metadata: None,
            })
            .await
            .unwrap();
        assert_eq!(created.currency, "USD");
        assert_eq!(created.status, "draft");
        assert_eq!(created.product_type, "simple");
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() {
        let repo = ProductRepository::new(DbService::in_memory().await.unwrap().pool);
        repo.create(product("SKU-1", "draft")).await.unwrap();
        let result = repo.create(product("SKU-1", "draft")).await;
        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn search_respects_status_and_restriction() {
        let repo = ProductRepository::new(DbService::in_memory().await.unwrap().pool);
        let a = repo.create(product("A", "published")).await.unwrap();
        let b = repo.create(product("B", "published")).await.unwrap();
        repo.create(product("C", "draft")).await.unwrap();

        let mut req = search_request();
        req.status = Some("published".to_string());
        let found = repo.search(&req, None).await.unwrap();
        assert_eq!(found.len(), 2);

        // Restriction narrows further
        let found = repo.search(&req, Some(&[b.id])).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, b.id);

        // Empty restriction means no facet filter matched anything
        assert!(repo.search(&req, Some(&[])).await.unwrap().is_empty());

        let _ = a;
    }

    #[tokio::test]
    async fn search_pages_by_name() {
        let repo = ProductRepository::new(DbService::in_memory().await.unwrap().pool);
        for sku in ["C", "A", "B"] {
            repo.create(product(sku, "draft")).await.unwrap();
        }

        let mut req = search_request();
        req.limit = 2;
        let page = repo.search(&req, None).await.unwrap();
        let names: Vec<&str> = page.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        req.offset = 2;
        let page = repo.search(&req, None).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "C");
    }
}
