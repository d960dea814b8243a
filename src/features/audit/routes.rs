use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::audit::handlers;
use crate::features::audit::services::AuditService;

/// Routes for the audit trail, nested under `/api/admin` by the caller
pub fn routes(service: Arc<AuditService>) -> Router {
    Router::new()
        .route("/audit-logs", get(handlers::list_audit_logs))
        .with_state(service)
}
