use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::audit::models::AuditLog;
use crate::shared::types::PaginationQuery;

/// Query params for listing the audit trail
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    /// Filter by entity type ("category", "order")
    pub entity_type: Option<String>,
    /// Filter by entity ID
    pub entity_id: Option<Uuid>,
    /// Filter by acting admin
    pub actor: Option<String>,
    #[serde(flatten)]
    #[param(ignore)]
    pub pagination: PaginationQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditLogResponseDto {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLog> for AuditLogResponseDto {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            actor: log.actor,
            action: log.action,
            entity_type: log.entity_type,
            entity_id: log.entity_id,
            before: log.before,
            after: log.after,
            created_at: log.created_at,
        }
    }
}
