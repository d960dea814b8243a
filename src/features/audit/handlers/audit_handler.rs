use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::audit::dtos::{AuditLogQuery, AuditLogResponseDto};
use crate::features::audit::services::AuditService;
use crate::features::auth::guards::RequireSuperAdmin;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// List audit trail entries (super admin only)
#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(AuditLogQuery, PaginationQuery),
    responses(
        (status = 200, description = "Audit entries, newest first", body = ApiResponse<Vec<AuditLogResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - super admin only")
    ),
    tag = "audit",
    security(("bearer_auth" = []))
)]
pub async fn list_audit_logs(
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    State(service): State<Arc<AuditService>>,
    AppQuery(query): AppQuery<AuditLogQuery>,
) -> Result<Json<ApiResponse<Vec<AuditLogResponseDto>>>> {
    let (logs, total) = service.list(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(logs),
        None,
        Some(Meta { total }),
    )))
}
