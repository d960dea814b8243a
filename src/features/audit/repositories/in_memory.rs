//! In-memory [`AuditRepository`] for router-level tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::audit::models::{AuditFilter, AuditLog, NewAuditLog};
use crate::features::audit::repositories::AuditRepository;

#[derive(Default)]
pub struct InMemoryAuditRepository {
    rows: Mutex<Vec<AuditLog>>,
}

impl InMemoryAuditRepository {
    pub fn entries(&self) -> Vec<AuditLog> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn record(&self, entry: &NewAuditLog) -> Result<AuditLog> {
        let log = AuditLog {
            id: Uuid::new_v4(),
            actor: entry.actor.clone(),
            action: entry.action.to_string(),
            entity_type: entry.entity_type.to_string(),
            entity_id: entry.entity_id,
            before: entry.before.clone(),
            after: entry.after.clone(),
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AuditLog>, i64)> {
        let matching: Vec<AuditLog> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|l| filter.entity_type.as_ref().is_none_or(|t| &l.entity_type == t))
            .filter(|l| filter.entity_id.is_none_or(|id| l.entity_id == id))
            .filter(|l| filter.actor.as_ref().is_none_or(|a| &l.actor == a))
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}
