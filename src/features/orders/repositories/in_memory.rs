//! In-memory [`OrderRepository`] for router-level tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::orders::models::{
    Order, OrderFilter, OrderItem, OrderStatus, PaymentStatus, StatusChange,
};
use crate::features::orders::repositories::OrderRepository;

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<Order>>,
    items: Mutex<Vec<OrderItem>>,
}

impl InMemoryOrderRepository {
    pub fn with(orders: Vec<Order>, items: Vec<OrderItem>) -> Self {
        Self {
            orders: Mutex::new(orders),
            items: Mutex::new(items),
        }
    }

    fn matching(&self, filter: &OrderFilter) -> Vec<Order> {
        let mut rows: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .filter(|o| filter.customer_id.is_none_or(|c| o.customer_id == c))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

/// Build an order row in `status` with sensible defaults
pub fn order(number: &str, status: OrderStatus) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::new_v4(),
        order_number: number.to_string(),
        customer_id: Uuid::new_v4(),
        status,
        payment_status: PaymentStatus::Paid,
        total_amount: Decimal::new(4999, 2),
        notes: None,
        admin_comment: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn item(order_id: Uuid, name: &str, quantity: i32, position: i32) -> OrderItem {
    OrderItem {
        id: Uuid::new_v4(),
        order_id,
        product_id: Some(Uuid::new_v4()),
        product_name: name.to_string(),
        quantity,
        unit_price: Decimal::new(1250, 2),
        position,
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn list(
        &self,
        filter: &OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Order>, i64)> {
        let rows = self.matching(filter);
        let total = rows.len() as i64;
        let page = rows
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_all(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        Ok(self.matching(filter))
    }

    async fn items_for(&self, order_id: Uuid) -> Result<Vec<OrderItem>> {
        let mut items: Vec<OrderItem> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.position);
        Ok(items)
    }

    async fn update_status(&self, id: Uuid, change: &StatusChange) -> Result<Option<Order>> {
        let mut orders = self.orders.lock().unwrap();
        let Some(order) = orders
            .iter_mut()
            .find(|o| o.id == id && o.status == change.from)
        else {
            return Ok(None);
        };

        order.status = change.to;
        if let Some(notes) = &change.notes {
            order.notes = Some(notes.clone());
        }
        if let Some(comment) = &change.admin_comment {
            order.admin_comment = Some(comment.clone());
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }
}
