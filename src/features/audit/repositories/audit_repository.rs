//! Port and PostgreSQL adapter for the audit trail.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::audit::models::{AuditFilter, AuditLog, NewAuditLog};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record(&self, entry: &NewAuditLog) -> Result<AuditLog>;

    /// Newest entries first, with the total number of matching rows
    async fn list(
        &self,
        filter: &AuditFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AuditLog>, i64)>;
}

pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FILTER_CLAUSE: &str = r#"
    WHERE ($1::TEXT IS NULL OR entity_type = $1)
      AND ($2::UUID IS NULL OR entity_id = $2)
      AND ($3::TEXT IS NULL OR actor = $3)
"#;

#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn record(&self, entry: &NewAuditLog) -> Result<AuditLog> {
        sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (actor, action, entity_type, entity_id, before, after)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, actor, action, entity_type, entity_id, before, after, created_at
            "#,
        )
        .bind(&entry.actor)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.before)
        .bind(&entry.after)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record audit log: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AuditLog>, i64)> {
        let count_sql = format!("SELECT COUNT(*) FROM audit_logs {}", FILTER_CLAUSE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&filter.entity_type)
            .bind(filter.entity_id)
            .bind(&filter.actor)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count audit logs: {:?}", e);
                AppError::Database(e)
            })?;

        let list_sql = format!(
            r#"
            SELECT id, actor, action, entity_type, entity_id, before, after, created_at
            FROM audit_logs
            {}
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
            FILTER_CLAUSE
        );
        let logs = sqlx::query_as::<_, AuditLog>(&list_sql)
            .bind(&filter.entity_type)
            .bind(filter.entity_id)
            .bind(&filter.actor)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list audit logs: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((logs, total))
    }
}
