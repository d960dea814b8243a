//! In-memory [`CategoryRepository`] for router-level tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::hierarchy::{CategoryForest, HierarchyError};
use crate::features::categories::models::{Category, CategoryChanges, CategoryLink, NewCategory};
use crate::features::categories::repositories::{CategoryRepository, MoveOutcome};

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    rows: Mutex<Vec<Category>>,
}

impl InMemoryCategoryRepository {
    pub fn with(categories: Vec<Category>) -> Self {
        Self {
            rows: Mutex::new(categories),
        }
    }

    fn modify<F>(&self, id: Uuid, apply: F) -> Option<Category>
    where
        F: FnOnce(&mut Category),
    {
        let mut rows = self.rows.lock().unwrap();
        let row = rows.iter_mut().find(|c| c.id == id)?;
        apply(row);
        row.updated_at = Utc::now();
        Some(row.clone())
    }
}

/// Build a category row with sensible defaults
pub fn category(name: &str, parent_id: Option<Uuid>) -> Category {
    let now = Utc::now();
    Category {
        id: Uuid::new_v4(),
        parent_id,
        name: name.to_string(),
        slug: crate::shared::validation::slugify(name),
        description: None,
        sort_order: 0,
        is_active: true,
        product_count: 0,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<Category>> {
        let mut rows: Vec<Category> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| include_inactive || c.is_active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        Ok(rows)
    }

    async fn create(&self, data: &NewCategory) -> Result<Category> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|c| c.slug == data.slug) {
            return Err(AppError::Conflict(
                "A category with this slug already exists".to_string(),
            ));
        }

        let mut row = category(&data.name, data.parent_id);
        row.slug = data.slug.clone();
        row.description = data.description.clone();
        row.sort_order = data.sort_order;
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: &CategoryChanges) -> Result<Option<Category>> {
        Ok(self.modify(id, |c| {
            if let Some(name) = &changes.name {
                c.name = name.clone();
            }
            if let Some(slug) = &changes.slug {
                c.slug = slug.clone();
            }
            if let Some(description) = &changes.description {
                c.description = Some(description.clone());
            }
        }))
    }

    async fn relocate(
        &self,
        id: Uuid,
        parent_id: Option<Uuid>,
        sort_order: Option<i32>,
    ) -> Result<MoveOutcome> {
        let mut rows = self.rows.lock().unwrap();
        let forest = CategoryForest::from_links(rows.iter().map(CategoryLink::from));
        if let Err(e) = forest.check_move(id, parent_id) {
            return Ok(MoveOutcome::Rejected(e));
        }

        let Some(row) = rows.iter_mut().find(|c| c.id == id) else {
            return Ok(MoveOutcome::Rejected(HierarchyError::NotFound(id)));
        };
        let before = row.clone();
        row.parent_id = parent_id;
        row.sort_order = sort_order.unwrap_or(before.sort_order);
        row.updated_at = Utc::now();
        Ok(MoveOutcome::Moved {
            before,
            after: row.clone(),
        })
    }

    async fn deactivate(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.modify(id, |c| c.is_active = false))
    }

    async fn count_active_children(&self, id: Uuid) -> Result<i64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.parent_id == Some(id) && c.is_active)
            .count() as i64)
    }
}
