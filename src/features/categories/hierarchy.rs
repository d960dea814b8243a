//! Category tree invariants.
//!
//! [`CategoryForest`] is an in-memory snapshot of every category's parent link.
//! Moves are validated against it before anything is persisted: a category may
//! never become its own ancestor. Ancestor walks are bounded by the number of
//! nodes so a cycle already present in stored data cannot hang a request.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::categories::models::CategoryLink;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("Category {0} not found")]
    NotFound(Uuid),

    #[error("Category cannot be its own parent")]
    InvalidParent,

    #[error("Moving category {category_id} under {parent_id} would create a circular reference")]
    CircularReference { category_id: Uuid, parent_id: Uuid },
}

impl From<HierarchyError> for AppError {
    fn from(err: HierarchyError) -> Self {
        match err {
            HierarchyError::NotFound(_) => AppError::NotFound(err.to_string()),
            HierarchyError::InvalidParent | HierarchyError::CircularReference { .. } => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryForest {
    parents: HashMap<Uuid, Option<Uuid>>,
}

impl CategoryForest {
    pub fn from_links<I>(links: I) -> Self
    where
        I: IntoIterator<Item = CategoryLink>,
    {
        Self {
            parents: links
                .into_iter()
                .map(|link| (link.id, link.parent_id))
                .collect(),
        }
    }

    fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.parents.contains_key(&id)
    }

    /// Parent of `id`; dangling parent references read as root
    fn parent_of(&self, id: Uuid) -> Option<Uuid> {
        self.parents.get(&id).copied().flatten()
    }

    /// Validate moving `category_id` under `new_parent_id` (`None` = root).
    pub fn check_move(
        &self,
        category_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> Result<(), HierarchyError> {
        if !self.contains(category_id) {
            return Err(HierarchyError::NotFound(category_id));
        }

        let Some(parent_id) = new_parent_id else {
            return Ok(());
        };

        if parent_id == category_id {
            return Err(HierarchyError::InvalidParent);
        }

        if !self.contains(parent_id) {
            return Err(HierarchyError::NotFound(parent_id));
        }

        let circular = HierarchyError::CircularReference {
            category_id,
            parent_id,
        };

        let mut cursor = Some(parent_id);
        let mut steps = 0usize;
        while let Some(current) = cursor {
            if current == category_id {
                return Err(circular);
            }
            steps += 1;
            if steps > self.len() {
                // Chain never reached a root: stored data already contains a cycle.
                tracing::warn!(
                    "Ancestor walk from {} exceeded {} steps",
                    parent_id,
                    self.len()
                );
                return Err(circular);
            }
            cursor = self.parent_of(current);
        }

        Ok(())
    }

    /// Ancestors of `id`, nearest parent first. Stops early on a corrupt cycle.
    pub fn ancestors(&self, id: Uuid) -> Vec<Uuid> {
        let mut ancestors = Vec::new();
        let mut cursor = self.parent_of(id);
        while let Some(current) = cursor {
            if current == id || ancestors.len() >= self.len() || ancestors.contains(&current) {
                break;
            }
            ancestors.push(current);
            cursor = self.parent_of(current);
        }
        ancestors
    }
}
