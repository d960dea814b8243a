//! Port and PostgreSQL adapter for orders.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::orders::models::{Order, OrderFilter, OrderItem, StatusChange};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>>;

    /// Newest orders first, with the total number of matching rows
    async fn list(&self, filter: &OrderFilter, limit: i64, offset: i64)
        -> Result<(Vec<Order>, i64)>;

    /// Every matching order, newest first
    async fn list_all(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Line items ordered by position
    async fn items_for(&self, order_id: Uuid) -> Result<Vec<OrderItem>>;

    /// Apply `change` only if the order is still in `change.from`.
    ///
    /// Returns `Ok(None)` when no row matched: the order is gone or another
    /// writer changed its status first.
    async fn update_status(&self, id: Uuid, change: &StatusChange) -> Result<Option<Order>>;
}

const ORDER_COLUMNS: &str = r#"
    id, order_number, customer_id, status, payment_status, total_amount,
    notes, admin_comment, created_at, updated_at
"#;

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::order_status IS NULL OR status = $1)
      AND ($2::UUID IS NULL OR customer_id = $2)
"#;

fn db_error(context: &str, e: sqlx::Error) -> AppError {
    tracing::error!("Failed to {}: {:?}", context, e);
    AppError::Database(e)
}

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("find order", e))
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Order>, i64)> {
        let count_sql = format!("SELECT COUNT(*) FROM orders {}", FILTER_CLAUSE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter.status)
            .bind(filter.customer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count orders", e))?;

        let list_sql = format!(
            "SELECT {} FROM orders {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            ORDER_COLUMNS, FILTER_CLAUSE
        );
        let orders = sqlx::query_as::<_, Order>(&list_sql)
            .bind(filter.status)
            .bind(filter.customer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("list orders", e))?;

        Ok((orders, total))
    }

    async fn list_all(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let sql = format!(
            "SELECT {} FROM orders {} ORDER BY created_at DESC",
            ORDER_COLUMNS, FILTER_CLAUSE
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(filter.status)
            .bind(filter.customer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("export orders", e))
    }

    async fn items_for(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, product_name, quantity, unit_price, position
            FROM order_items
            WHERE order_id = $1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("load order items", e))
    }

    async fn update_status(&self, id: Uuid, change: &StatusChange) -> Result<Option<Order>> {
        let sql = format!(
            r#"
            UPDATE orders
            SET
                status = $3,
                notes = COALESCE($4, notes),
                admin_comment = COALESCE($5, admin_comment),
                updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(change.from)
            .bind(change.to)
            .bind(&change.notes)
            .bind(&change.admin_comment)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("update order status", e))
    }
}
