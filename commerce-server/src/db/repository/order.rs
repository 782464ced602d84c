//! Order repository
//!
//! Order creation writes the header and its line items in one
//! transaction; the total is derived from the items.

use super::{RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderDetail, OrderItem, OrderUpdate};
use sqlx::SqlitePool;

/// Allowed status transitions, enforced at the repository layer
const STATUSES: &[&str] = &["pending", "paid", "shipped", "completed", "cancelled"];

#[derive(Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn find_by_store(&self, store_id: i64) -> RepoResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE store_id = ? ORDER BY created_at DESC",
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn find_detail(&self, id: i64) -> RepoResult<Option<OrderDetail>> {
        let Some(order) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let items =
            sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ? ORDER BY id")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
        Ok(Some(OrderDetail { order, items }))
    }

    pub async fn create(&self, data: OrderCreate) -> RepoResult<OrderDetail> {
        if data.items.is_empty() {
            return Err(RepoError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }
        for item in &data.items {
            if item.quantity <= 0 {
                return Err(RepoError::Validation(format!(
                    "Item quantity must be positive (product {})",
                    item.product_id
                )));
            }
        }

        let total_cents: i64 = data
            .items
            .iter()
            .map(|i| i.quantity * i.unit_price_cents)
            .sum();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO orders (store_id, customer_email, total_cents, currency) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(data.store_id)
        .bind(&data.customer_email)
        .bind(total_cents)
        .bind(data.currency.as_deref().unwrap_or("USD"))
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for item in &data.items {
            sqlx::query(
                "INSERT INTO order_items \
                 (order_id, product_id, variant_id, quantity, unit_price_cents) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(item.product_id)
            .bind(item.variant_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .execute(&mut *tx)
            .await?;
        }

        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let items =
            sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ? ORDER BY id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(OrderDetail { order, items })
    }

    pub async fn update(&self, id: i64, data: OrderUpdate) -> RepoResult<Order> {
        if let Some(status) = &data.status
            && !STATUSES.contains(&status.as_str())
        {
            return Err(RepoError::Validation(format!(
                "Unknown order status '{status}'"
            )));
        }

        sqlx::query(
            "UPDATE orders SET \
             status = COALESCE(?, status), \
             customer_email = COALESCE(?, customer_email), \
             updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&data.status)
        .bind(&data.customer_email)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
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
    use crate::db::models::{OrderItemCreate, ProductCreate};
    use crate::db::repository::ProductRepository;
    use sqlx::SqlitePool;

    async fn setup() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }

    async fn make_product(pool: &SqlitePool, sku: &str) -> i64 {
        ProductRepository::new(pool.clone())
            .create(ProductCreate {
                sku: sku.to_string(),
                name: sku.to_string(),
                description: None,
                price_cents: 1000,
                currency: None,
                status: None,
                product_type: None,
                category_id: None,
                metadata: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_derives_total_from_items() {
        let pool = setup().await;
        let p1 = make_product(&pool, "P1").await;
        let p2 = make_product(&pool, "P2").await;

        let repo = OrderRepository::new(pool.clone());
        let detail = repo
            .create(OrderCreate {
                store_id: None,
                customer_email: "buyer@example.com".to_string(),
                currency: None,
                items: vec![
                    OrderItemCreate {
                        product_id: p1,
                        variant_id: None,
                        quantity: 2,
                        unit_price_cents: 1500,
                    },
                    OrderItemCreate {
                        product_id: p2,
                        variant_id: None,
                        quantity: 1,
                        unit_price_cents: 700,
                    },
                ],
            })
            .await
            .unwrap();

        assert_eq!(detail.order.total_cents, 2 * 1500 + 700);
        assert_eq!(detail.order.status, "pending");
        assert_eq!(detail.order.currency, "USD");
        assert_eq!(detail.items.len(), 2);
    }

    #[tokio::test]
    async fn empty_orders_are_rejected() {
        let pool = setup().await;
        let repo = OrderRepository::new(pool.clone());
        let result = repo
            .create(OrderCreate {
                store_id: None,
                customer_email: "buyer@example.com".to_string(),
                currency: None,
                items: vec![],
            })
            .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let pool = setup().await;
        let p1 = make_product(&pool, "P1").await;
        let repo = OrderRepository::new(pool.clone());
        let result = repo
            .create(OrderCreate {
                store_id: None,
                customer_email: "buyer@example.com".to_string(),
                currency: None,
                items: vec![OrderItemCreate {
                    product_id: p1,
                    variant_id: None,
                    quantity: 0,
                    unit_price_cents: 100,
                }],
            })
            .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let pool = setup().await;
        let p1 = make_product(&pool, "P1").await;
        let repo = OrderRepository::new(pool.clone());
        let detail = repo
            .create(OrderCreate {
                store_id: None,
                customer_email: "buyer@example.com".to_string(),
                currency: None,
                items: vec![OrderItemCreate {
                    product_id: p1,
                    variant_id: None,
                    quantity: 1,
                    unit_price_cents: 100,
                }],
            })
            .await
            .unwrap();

        let result = repo
            .update(
                detail.order.id,
                OrderUpdate {
                    status: Some("refunded".to_string()),
                    customer_email: None,
                },
            )
            .await;
        assert!(matches!(result, Err(RepoError::Validation(_))));

        let updated = repo
            .update(
                detail.order.id,
                OrderUpdate {
                    status: Some("paid".to_string()),
                    customer_email: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "paid");
    }

    #[tokio::test]
    async fn delete_removes_items_via_cascade() {
        let pool = setup().await;
        let p1 = make_product(&pool, "P1").await;
        let repo = OrderRepository::new(pool.clone());
        let detail = repo
            .create(OrderCreate {
                store_id: None,
                customer_email: "buyer@example.com".to_string(),
                currency: None,
                items: vec![OrderItemCreate {
                    product_id: p1,
                    variant_id: None,
                    quantity: 1,
                    unit_price_cents: 100,
                }],
            })
            .await
            .unwrap();

        assert!(repo.delete(detail.order.id).await.unwrap());
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
