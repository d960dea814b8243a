use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::orders::dtos::{
    ExportOrdersQuery, ListOrdersQuery, OrderDetailDto, OrderResponseDto, OrderTransitionsDto,
    UpdateOrderStatusDto,
};
use crate::features::orders::services::OrderService;
use crate::shared::export::export_response;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List orders, newest first
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(ListOrdersQuery, PaginationQuery),
    responses(
        (status = 200, description = "Page of orders", body = ApiResponse<Vec<OrderResponseDto>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    AppQuery(query): AppQuery<ListOrdersQuery>,
) -> Result<Json<ApiResponse<Vec<OrderResponseDto>>>> {
    let (orders, total) = service.list(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(orders),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with line items", body = ApiResponse<OrderDetailDto>),
        (status = 404, description = "Order not found")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderDetailDto>>> {
    let order = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(order), None, None)))
}

/// Change order status
///
/// Only transitions allowed by the order lifecycle are accepted; anything else
/// is a 400 naming both statuses.
#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponseDto>),
        (status = 400, description = "Transition not allowed"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order changed concurrently")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn update_order_status(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateOrderStatusDto>,
) -> Result<Json<ApiResponse<OrderResponseDto>>> {
    dto.validate()?;

    let order = service.update_status(id, dto, &admin.sub).await?;
    Ok(Json(ApiResponse::success(
        Some(order),
        Some("Order status updated".to_string()),
        None,
    )))
}

/// Statuses the order may move to next
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}/transitions",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Allowed next statuses", body = ApiResponse<OrderTransitionsDto>),
        (status = 404, description = "Order not found")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn get_order_transitions(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<OrderTransitionsDto>>> {
    let transitions = service.transitions(id).await?;
    Ok(Json(ApiResponse::success(Some(transitions), None, None)))
}

/// Download orders as CSV or JSON
#[utoipa::path(
    get,
    path = "/api/admin/orders/export",
    params(ExportOrdersQuery),
    responses(
        (status = 200, description = "File download", body = String, content_type = "text/csv"),
        (status = 400, description = "Invalid query parameters")
    ),
    tag = "orders",
    security(("bearer_auth" = []))
)]
pub async fn export_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<OrderService>>,
    AppQuery(query): AppQuery<ExportOrdersQuery>,
) -> Result<Response> {
    let rows = service.export_rows(&query).await?;
    export_response("orders", query.format, &rows)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{http::StatusCode, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::audit::repositories::in_memory::InMemoryAuditRepository;
    use crate::features::audit::AuditService;
    use crate::features::orders::models::{Order, OrderStatus};
    use crate::features::orders::repositories::in_memory::{item, order, InMemoryOrderRepository};
    use crate::features::orders::routes;
    use crate::features::orders::services::OrderService;
    use crate::shared::test_helpers::{with_admin_auth, TEST_ADMIN_SUB};

    struct Harness {
        server: TestServer,
        audit: Arc<InMemoryAuditRepository>,
    }

    fn harness(orders: Vec<Order>) -> Harness {
        let items = orders
            .iter()
            .flat_map(|o| [item(o.id, "Mug", 1, 1), item(o.id, "Tea", 2, 0)])
            .collect();
        let audit = Arc::new(InMemoryAuditRepository::default());
        let service = Arc::new(OrderService::new(
            Arc::new(InMemoryOrderRepository::with(orders, items)),
            Arc::new(AuditService::new(audit.clone())),
        ));
        let app = with_admin_auth(Router::new().nest("/api/admin", routes::routes(service)));
        Harness {
            server: TestServer::new(app).unwrap(),
            audit,
        }
    }

    #[tokio::test]
    async fn test_walk_through_fulfilment() {
        let o = order("ORD-2001", OrderStatus::Pending);
        let h = harness(vec![o.clone()]);

        for next in ["confirmed", "processing", "shipped", "delivered", "refunded"] {
            let response = h
                .server
                .patch(&format!("/api/admin/orders/{}/status", o.id))
                .json(&json!({ "status": next }))
                .await;
            response.assert_status_ok();
            let body: Value = response.json();
            assert_eq!(body["data"]["status"], next);
        }

        let entries = h.audit.entries();
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.actor == TEST_ADMIN_SUB));
    }

    #[tokio::test]
    async fn test_invalid_transition_returns_400_naming_both_states() {
        let o = order("ORD-2002", OrderStatus::Delivered);
        let h = harness(vec![o.clone()]);

        let response = h
            .server
            .patch(&format!("/api/admin/orders/{}/status", o.id))
            .json(&json!({ "status": "pending" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "Cannot change order status from delivered to pending"
        );
        assert!(h.audit.entries().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_cannot_resume_fulfilment() {
        let o = order("ORD-2003", OrderStatus::Cancelled);
        let h = harness(vec![o.clone()]);

        for next in ["pending", "confirmed", "processing", "shipped", "delivered", "cancelled"] {
            h.server
                .patch(&format!("/api/admin/orders/{}/status", o.id))
                .json(&json!({ "status": next }))
                .await
                .assert_status_bad_request();
        }
    }

    #[tokio::test]
    async fn test_unknown_status_value_returns_400() {
        let o = order("ORD-2004", OrderStatus::Pending);
        let h = harness(vec![o.clone()]);
        h.server
            .patch(&format!("/api/admin/orders/{}/status", o.id))
            .json(&json!({ "status": "teleported" }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_unknown_order_returns_404() {
        let h = harness(vec![]);
        h.server
            .patch(&format!("/api/admin/orders/{}/status", uuid::Uuid::new_v4()))
            .json(&json!({ "status": "confirmed" }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_detail_orders_items_by_position() {
        let o = order("ORD-2005", OrderStatus::Shipped);
        let h = harness(vec![o.clone()]);

        let body: Value = h
            .server
            .get(&format!("/api/admin/orders/{}", o.id))
            .await
            .json();
        assert_eq!(body["data"]["order_number"], "ORD-2005");
        assert_eq!(body["data"]["items"][0]["product_name"], "Tea");
        assert_eq!(body["data"]["items"][1]["product_name"], "Mug");
        assert_eq!(
            body["data"]["allowed_transitions"],
            json!(["delivered", "cancelled"])
        );
    }

    #[tokio::test]
    async fn test_transitions_endpoint() {
        let o = order("ORD-2006", OrderStatus::Refunded);
        let h = harness(vec![o.clone()]);

        let body: Value = h
            .server
            .get(&format!("/api/admin/orders/{}/transitions", o.id))
            .await
            .json();
        assert_eq!(body["data"]["current"], "refunded");
        assert_eq!(body["data"]["allowed"], json!([]));
        assert_eq!(body["data"]["is_terminal"], true);
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let h = harness(vec![
            order("ORD-1", OrderStatus::Pending),
            order("ORD-2", OrderStatus::Shipped),
            order("ORD-3", OrderStatus::Shipped),
        ]);

        let response = h
            .server
            .get("/api/admin/orders")
            .add_query_param("status", "shipped")
            .add_query_param("page_size", 1)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_list_huge_page_returns_empty_page() {
        let h = harness(vec![
            order("ORD-1", OrderStatus::Pending),
            order("ORD-2", OrderStatus::Shipped),
        ]);

        let response = h
            .server
            .get("/api/admin/orders")
            .add_query_param("page", i64::MAX)
            .add_query_param("page_size", 100)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 2);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn test_list_rejects_non_numeric_page() {
        let h = harness(vec![]);
        h.server
            .get("/api/admin/orders")
            .add_query_param("page", "two")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_list_rejects_unknown_status_filter() {
        let h = harness(vec![]);
        h.server
            .get("/api/admin/orders")
            .add_query_param("status", "lost")
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_export_json() {
        let h = harness(vec![order("ORD-9", OrderStatus::Delivered)]);
        let response = h
            .server
            .get("/api/admin/orders/export")
            .add_query_param("format", "json")
            .await;

        response.assert_status(StatusCode::OK);
        let disposition = response.header("content-disposition");
        let disposition = disposition.to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"orders-"));
        assert!(disposition.ends_with(".json\""));
        let rows: Value = response.json();
        assert_eq!(rows[0]["order_number"], "ORD-9");
        assert_eq!(rows[0]["status"], "delivered");
    }
}
