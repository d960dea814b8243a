use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::audit::dtos::{AuditLogQuery, AuditLogResponseDto};
use crate::features::audit::models::{AuditFilter, NewAuditLog};
use crate::features::audit::repositories::AuditRepository;

/// Records who changed what, with before/after snapshots
pub struct AuditService {
    repo: Arc<dyn AuditRepository>,
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    /// Record a mutation that has already been persisted.
    ///
    /// A failed write is logged and swallowed: the mutation it describes is
    /// already committed and must not be reported to the caller as failed.
    pub async fn record(
        &self,
        actor: &str,
        action: &'static str,
        entity_type: &'static str,
        entity_id: Uuid,
        before: Option<Value>,
        after: Option<Value>,
    ) {
        let entry = NewAuditLog {
            actor: actor.to_string(),
            action,
            entity_type,
            entity_id,
            before,
            after,
        };

        match self.repo.record(&entry).await {
            Ok(log) => tracing::debug!("Audit {} recorded for {} {}", log.id, action, entity_id),
            Err(e) => tracing::error!(
                "Failed to record audit entry {} for {} {}: {}",
                action,
                entity_type,
                entity_id,
                e
            ),
        }
    }

    pub async fn list(&self, query: &AuditLogQuery) -> Result<(Vec<AuditLogResponseDto>, i64)> {
        let filter = AuditFilter {
            entity_type: query.entity_type.clone(),
            entity_id: query.entity_id,
            actor: query.actor.clone(),
        };
        let pagination = &query.pagination;
        let (logs, total) = self
            .repo
            .list(&filter, pagination.limit(), pagination.offset())
            .await?;

        Ok((logs.into_iter().map(Into::into).collect(), total))
    }
}
