use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit::AuditService;
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryExportRow, CategoryRefDto, CategoryResponseDto, CategoryTreeDto,
    CreateCategoryDto, MoveCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::hierarchy::CategoryForest;
use crate::features::categories::models::{Category, CategoryChanges, NewCategory};
use crate::features::categories::repositories::{CategoryRepository, MoveOutcome};
use crate::shared::constants::{
    AUDIT_CATEGORY_CREATE, AUDIT_CATEGORY_DEACTIVATE, AUDIT_CATEGORY_MOVE, AUDIT_CATEGORY_UPDATE,
};
use crate::shared::validation::{slugify, SLUG_REGEX};

const ENTITY_TYPE: &str = "category";

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}

/// Service for category operations, including hierarchy moves
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    audit: Arc<AuditService>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>, audit: Arc<AuditService>) -> Self {
        Self { repo, audit }
    }

    /// List categories (flat list)
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repo.list(include_inactive).await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// List categories as tree structure
    pub async fn list_tree(&self, include_inactive: bool) -> Result<Vec<CategoryTreeDto>> {
        let categories = self.repo.list(include_inactive).await?;
        Ok(CategoryTreeDto::build_tree(categories))
    }

    /// Get category by ID with its breadcrumb
    pub async fn get(&self, id: Uuid) -> Result<CategoryDetailDto> {
        let category = self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        let all = self.repo.list(true).await?;

        let forest = CategoryForest::from_links(all.iter().map(Into::into));
        let by_id: HashMap<Uuid, &Category> = all.iter().map(|c| (c.id, c)).collect();
        let breadcrumb = forest
            .ancestors(id)
            .into_iter()
            .rev()
            .filter_map(|ancestor| by_id.get(&ancestor))
            .map(|c| CategoryRefDto {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
            })
            .collect();

        Ok(CategoryDetailDto {
            category: category.into(),
            breadcrumb,
        })
    }

    pub async fn create(&self, dto: CreateCategoryDto, actor: &str) -> Result<CategoryResponseDto> {
        let slug = match dto.slug {
            Some(slug) => slug,
            None => {
                let derived = slugify(&dto.name);
                if !SLUG_REGEX.is_match(&derived) {
                    return Err(AppError::Validation(
                        "Slug could not be derived from name; provide one explicitly".to_string(),
                    ));
                }
                derived
            }
        };

        if let Some(parent_id) = dto.parent_id {
            self.repo.find_by_id(parent_id).await?.ok_or_else(|| {
                AppError::NotFound(format!("Parent category {} not found", parent_id))
            })?;
        }

        self.ensure_slug_available(&slug, None).await?;

        let category = self
            .repo
            .create(&NewCategory {
                parent_id: dto.parent_id,
                name: dto.name,
                slug,
                description: dto.description,
                sort_order: dto.sort_order,
            })
            .await?;

        tracing::info!("Category {} ({}) created", category.id, category.slug);
        self.audit
            .record(
                actor,
                AUDIT_CATEGORY_CREATE,
                ENTITY_TYPE,
                category.id,
                None,
                Some(snapshot(&category)),
            )
            .await;

        Ok(category.into())
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateCategoryDto,
        actor: &str,
    ) -> Result<CategoryResponseDto> {
        let before = self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

        if let Some(slug) = &dto.slug {
            self.ensure_slug_available(slug, Some(id)).await?;
        }

        let changes = CategoryChanges {
            name: dto.name,
            slug: dto.slug,
            description: dto.description,
        };
        let after = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| not_found(id))?;

        self.audit
            .record(
                actor,
                AUDIT_CATEGORY_UPDATE,
                ENTITY_TYPE,
                id,
                Some(snapshot(&before)),
                Some(snapshot(&after)),
            )
            .await;

        Ok(after.into())
    }

    /// Reparent and/or reorder a category.
    ///
    /// Rejects self-parenting and any parent inside the category's own subtree.
    pub async fn move_category(
        &self,
        id: Uuid,
        dto: MoveCategoryDto,
        actor: &str,
    ) -> Result<CategoryResponseDto> {
        let (before, after) = match self
            .repo
            .relocate(id, dto.parent_id, dto.sort_order)
            .await?
        {
            MoveOutcome::Moved { before, after } => (before, after),
            MoveOutcome::Rejected(e) => {
                tracing::warn!("Rejected move of category {}: {}", id, e);
                return Err(e.into());
            }
        };

        tracing::info!(
            "Category {} moved: parent {:?} -> {:?}, sort_order {} -> {}",
            id,
            before.parent_id,
            after.parent_id,
            before.sort_order,
            after.sort_order
        );
        self.audit
            .record(
                actor,
                AUDIT_CATEGORY_MOVE,
                ENTITY_TYPE,
                id,
                Some(placement(&before)),
                Some(placement(&after)),
            )
            .await;

        Ok(after.into())
    }

    /// Soft-delete a category that no longer has active children or products
    pub async fn deactivate(&self, id: Uuid, actor: &str) -> Result<CategoryResponseDto> {
        let before = self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))?;

        let active_children = self.repo.count_active_children(id).await?;
        if active_children > 0 {
            return Err(AppError::Conflict(format!(
                "Category has {} active subcategories; move or deactivate them first",
                active_children
            )));
        }
        if before.product_count > 0 {
            return Err(AppError::Conflict(format!(
                "Category still has {} products assigned",
                before.product_count
            )));
        }

        let after = self
            .repo
            .deactivate(id)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::info!("Category {} deactivated", id);
        self.audit
            .record(
                actor,
                AUDIT_CATEGORY_DEACTIVATE,
                ENTITY_TYPE,
                id,
                Some(json!({ "is_active": before.is_active })),
                Some(json!({ "is_active": after.is_active })),
            )
            .await;

        Ok(after.into())
    }

    pub async fn export_rows(&self, include_inactive: bool) -> Result<Vec<CategoryExportRow>> {
        let categories = self.repo.list(include_inactive).await?;
        Ok(categories.into_iter().map(Into::into).collect())
    }

    async fn ensure_slug_available(&self, slug: &str, except: Option<Uuid>) -> Result<()> {
        match self.repo.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::Conflict(format!(
                "Slug '{}' is already used by another category",
                slug
            ))),
            _ => Ok(()),
        }
    }
}

fn snapshot(c: &Category) -> serde_json::Value {
    json!({
        "name": c.name,
        "slug": c.slug,
        "description": c.description,
        "parent_id": c.parent_id,
        "sort_order": c.sort_order,
        "is_active": c.is_active,
    })
}

fn placement(c: &Category) -> serde_json::Value {
    json!({ "parent_id": c.parent_id, "sort_order": c.sort_order })
}
