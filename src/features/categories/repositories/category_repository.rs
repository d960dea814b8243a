//! Port and PostgreSQL adapter for category persistence.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::hierarchy::{CategoryForest, HierarchyError};
use crate::features::categories::models::{Category, CategoryChanges, CategoryLink, NewCategory};

/// Result of a guarded move
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved { before: Category, after: Category },
    Rejected(HierarchyError),
}

/// Storage contract for categories.
///
/// Plain mutations return `Ok(None)` when the row does not exist so the
/// service decides how to report it; moves report it as a rejection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// All categories ordered by sort order then name
    async fn list(&self, include_inactive: bool) -> Result<Vec<Category>>;

    async fn create(&self, data: &NewCategory) -> Result<Category>;

    async fn update(&self, id: Uuid, changes: &CategoryChanges) -> Result<Option<Category>>;

    /// Reparent and/or reorder a category. The hierarchy check and the write
    /// run under one lock so concurrent moves cannot combine into a cycle.
    /// `sort_order: None` keeps the stored value.
    async fn relocate(
        &self,
        id: Uuid,
        parent_id: Option<Uuid>,
        sort_order: Option<i32>,
    ) -> Result<MoveOutcome>;

    async fn deactivate(&self, id: Uuid) -> Result<Option<Category>>;

    async fn count_active_children(&self, id: Uuid) -> Result<i64>;
}

/// Transaction-scoped advisory lock key serializing category moves
const CATEGORY_MOVE_LOCK: i64 = 0x6361_745f_6d6f_7665;

const CATEGORY_COLUMNS: &str = r#"
    c.id, c.parent_id, c.name, c.slug, c.description, c.sort_order, c.is_active,
    (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count,
    c.created_at, c.updated_at
"#;

/// Wrap a data-modifying statement (`... RETURNING *`) so the new row is read
/// back with its product count. The outer SELECT must read from the CTE: the
/// table itself still shows the pre-statement snapshot.
fn returning_category(statement: &str) -> String {
    format!("WITH c AS ({}) SELECT {} FROM c", statement, CATEGORY_COLUMNS)
}

/// Convert database error to more specific AppError with user-friendly messages
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23505")) {
            return AppError::Conflict("A category with this slug already exists".to_string());
        }

        // Foreign key violation
        if db_err.code() == Some(std::borrow::Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced category does not exist".to_string());
        }
    }

    tracing::error!("Category query failed: {:?}", e);
    AppError::Database(e)
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let sql = format!("SELECT {} FROM categories c WHERE c.id = $1", CATEGORY_COLUMNS);
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let sql = format!(
            "SELECT {} FROM categories c WHERE c.slug = $1",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Category>> {
        let sql = format!(
            "SELECT {} FROM categories c WHERE ($1 OR c.is_active = TRUE) ORDER BY c.sort_order, c.name",
            CATEGORY_COLUMNS
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(include_inactive)
            .fetch_all(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn create(&self, data: &NewCategory) -> Result<Category> {
        let sql = returning_category(
            r#"
            INSERT INTO categories (parent_id, name, slug, description, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(data.parent_id)
            .bind(&data.name)
            .bind(&data.slug)
            .bind(&data.description)
            .bind(data.sort_order)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update(&self, id: Uuid, changes: &CategoryChanges) -> Result<Option<Category>> {
        let sql = returning_category(
            r#"
            UPDATE categories
            SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.slug)
            .bind(&changes.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn relocate(
        &self,
        id: Uuid,
        parent_id: Option<Uuid>,
        sort_order: Option<i32>,
    ) -> Result<MoveOutcome> {
        let mut tx = self.pool.begin().await.map_err(handle_db_error)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(CATEGORY_MOVE_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        let sql = format!(
            "SELECT {} FROM categories c WHERE c.id = $1",
            CATEGORY_COLUMNS
        );
        let Some(before) = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(handle_db_error)?
        else {
            return Ok(MoveOutcome::Rejected(HierarchyError::NotFound(id)));
        };

        let links = sqlx::query_as::<_, CategoryLink>("SELECT id, parent_id FROM categories")
            .fetch_all(&mut *tx)
            .await
            .map_err(handle_db_error)?;
        if let Err(e) = CategoryForest::from_links(links).check_move(id, parent_id) {
            // Dropping the transaction rolls back and releases the lock
            return Ok(MoveOutcome::Rejected(e));
        }

        let sql = returning_category(
            r#"
            UPDATE categories
            SET parent_id = $2, sort_order = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        );
        let after = sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(parent_id)
            .bind(sort_order.unwrap_or(before.sort_order))
            .fetch_one(&mut *tx)
            .await
            .map_err(handle_db_error)?;

        tx.commit().await.map_err(handle_db_error)?;
        Ok(MoveOutcome::Moved { before, after })
    }

    async fn deactivate(&self, id: Uuid) -> Result<Option<Category>> {
        let sql = returning_category(
            r#"
            UPDATE categories
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn count_active_children(&self, id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE parent_id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(handle_db_error)
    }
}
