use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for category, including its computed product count
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub product_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parent link of a single category, the only data the hierarchy checks need
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct CategoryLink {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
}

impl From<&Category> for CategoryLink {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
        }
    }
}

/// Data for creating a new category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

/// Editable attributes; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}
