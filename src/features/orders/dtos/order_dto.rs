use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::orders::models::{Order, OrderFilter, OrderItem, OrderStatus, PaymentStatus};
use crate::shared::export::ExportFormat;
use crate::shared::types::PaginationQuery;

/// Query params for listing orders
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
    #[serde(flatten)]
    #[param(ignore)]
    pub pagination: PaginationQuery,
}

impl ListOrdersQuery {
    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            status: self.status,
            customer_id: self.customer_id,
        }
    }
}

/// Query params for exporting orders
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportOrdersQuery {
    /// "csv" (default) or "json"
    #[serde(default)]
    pub format: ExportFormat,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
}

impl ExportOrdersQuery {
    pub fn filter(&self) -> OrderFilter {
        OrderFilter {
            status: self.status,
            customer_id: self.customer_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponseDto {
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

impl From<Order> for OrderResponseDto {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            order_number: o.order_number,
            customer_id: o.customer_id,
            status: o.status,
            payment_status: o.payment_status,
            total_amount: o.total_amount,
            notes: o.notes,
            admin_comment: o.admin_comment,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemDto {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        Self {
            id: i.id,
            product_id: i.product_id,
            line_total: i.unit_price * Decimal::from(i.quantity),
            product_name: i.product_name,
            quantity: i.quantity,
            unit_price: i.unit_price,
        }
    }
}

/// Order with line items and the statuses it may move to next
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailDto {
    #[serde(flatten)]
    pub order: OrderResponseDto,
    pub items: Vec<OrderItemDto>,
    pub allowed_transitions: Vec<OrderStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderTransitionsDto {
    pub current: OrderStatus,
    pub allowed: Vec<OrderStatus>,
    pub is_terminal: bool,
}

impl From<OrderStatus> for OrderTransitionsDto {
    fn from(status: OrderStatus) -> Self {
        Self {
            current: status,
            allowed: status.allowed_transitions().to_vec(),
            is_terminal: status.is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusDto {
    pub status: OrderStatus,

    /// Note visible to the customer
    #[validate(length(max = 1000, message = "Notes must not exceed 1000 characters"))]
    pub notes: Option<String>,

    /// Internal back-office comment
    #[validate(length(max = 1000, message = "Admin comment must not exceed 1000 characters"))]
    pub admin_comment: Option<String>,
}

/// Flat export row
#[derive(Debug, Clone, Serialize)]
pub struct OrderExportRow {
    pub id: Uuid,
    pub order_number: String,
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderExportRow {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            order_number: o.order_number,
            customer_id: o.customer_id,
            status: o.status,
            payment_status: o.payment_status,
            total_amount: o.total_amount,
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}
