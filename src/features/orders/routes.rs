use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Routes for order management, nested under `/api/admin` by the caller
pub fn routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route("/orders", get(handlers::list_orders))
        .route("/orders/export", get(handlers::export_orders))
        .route("/orders/{id}", get(handlers::get_order))
        .route("/orders/{id}/status", patch(handlers::update_order_status))
        .route(
            "/orders/{id}/transitions",
            get(handlers::get_order_transitions),
        )
        .with_state(service)
}
