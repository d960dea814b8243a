use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use super::OrderStatus;

/// Payment status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// Database model for order
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub admin_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for an order line item
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub position: i32,
}

/// Optional filters for listing orders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
}

/// A validated status change, applied only if the order is still in `from`
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub notes: Option<String>,
    pub admin_comment: Option<String>,
}
