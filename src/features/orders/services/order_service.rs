use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit::AuditService;
use crate::features::orders::dtos::{
    ExportOrdersQuery, ListOrdersQuery, OrderDetailDto, OrderExportRow, OrderResponseDto,
    OrderTransitionsDto, UpdateOrderStatusDto,
};
use crate::features::orders::models::{Order, StatusChange};
use crate::features::orders::repositories::OrderRepository;
use crate::shared::constants::AUDIT_ORDER_STATUS_UPDATE;

const ENTITY_TYPE: &str = "order";

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Order {} not found", id))
}

/// Service for order browsing and status transitions
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    audit: Arc<AuditService>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, audit: Arc<AuditService>) -> Self {
        Self { repo, audit }
    }

    pub async fn list(&self, query: &ListOrdersQuery) -> Result<(Vec<OrderResponseDto>, i64)> {
        let pagination = &query.pagination;
        let (orders, total) = self
            .repo
            .list(&query.filter(), pagination.limit(), pagination.offset())
            .await?;
        Ok((orders.into_iter().map(Into::into).collect(), total))
    }

    /// Get order with its line items
    pub async fn get(&self, id: Uuid) -> Result<OrderDetailDto> {
        let order = self.find(id).await?;
        let items = self.repo.items_for(id).await?;

        Ok(OrderDetailDto {
            allowed_transitions: order.status.allowed_transitions().to_vec(),
            order: order.into(),
            items: items.into_iter().map(Into::into).collect(),
        })
    }

    pub async fn transitions(&self, id: Uuid) -> Result<OrderTransitionsDto> {
        let order = self.find(id).await?;
        Ok(order.status.into())
    }

    /// Move an order to a new status if the transition graph allows it.
    ///
    /// The write only applies while the order is still in the status that was
    /// validated; losing that race is reported as a conflict.
    pub async fn update_status(
        &self,
        id: Uuid,
        dto: UpdateOrderStatusDto,
        actor: &str,
    ) -> Result<OrderResponseDto> {
        let before = self.find(id).await?;

        if let Err(e) = before.status.check_transition(dto.status) {
            tracing::warn!("Rejected status change on order {}: {}", id, e);
            return Err(e.into());
        }

        let change = StatusChange {
            from: before.status,
            to: dto.status,
            notes: dto.notes,
            admin_comment: dto.admin_comment,
        };
        let after = self.repo.update_status(id, &change).await?.ok_or_else(|| {
            AppError::Conflict(format!(
                "Order {} was modified concurrently; reload and retry",
                id
            ))
        })?;

        tracing::info!(
            "Order {} status changed: {} -> {}",
            after.order_number,
            before.status,
            after.status
        );
        self.audit
            .record(
                actor,
                AUDIT_ORDER_STATUS_UPDATE,
                ENTITY_TYPE,
                id,
                Some(json!({ "status": before.status })),
                Some(json!({
                    "status": after.status,
                    "notes": change.notes,
                    "admin_comment": change.admin_comment,
                })),
            )
            .await;

        Ok(after.into())
    }

    pub async fn export_rows(&self, query: &ExportOrdersQuery) -> Result<Vec<OrderExportRow>> {
        let orders = self.repo.list_all(&query.filter()).await?;
        Ok(orders.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Order> {
        self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }
}
