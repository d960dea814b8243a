use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Routes for category management, nested under `/api/admin` by the caller
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/categories/export", get(handlers::export_categories))
        .route(
            "/categories/{id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::deactivate_category),
        )
        .route("/categories/{id}/move", patch(handlers::move_category))
        .with_state(service)
}
