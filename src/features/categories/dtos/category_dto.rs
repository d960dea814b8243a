use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::export::ExportFormat;
use crate::shared::validation::SLUG_REGEX;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
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

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            sort_order: c.sort_order,
            is_active: c.is_active,
            product_count: c.product_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Minimal reference used for breadcrumbs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRefDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

/// Category with its ancestor path, root first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub breadcrumb: Vec<CategoryRefDto>,
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub product_count: i64,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build tree from flat list of categories.
    ///
    /// Siblings are ordered by sort order then name. Categories whose parent is
    /// not in the list (e.g. filtered out as inactive) are not shown.
    pub fn build_tree(categories: Vec<Category>) -> Vec<CategoryTreeDto> {
        let mut children_of: HashMap<Option<Uuid>, Vec<&Category>> = HashMap::new();
        for category in &categories {
            children_of
                .entry(category.parent_id)
                .or_default()
                .push(category);
        }
        for siblings in children_of.values_mut() {
            siblings.sort_by(|a, b| (a.sort_order, &a.name).cmp(&(b.sort_order, &b.name)));
        }

        children_of
            .get(&None)
            .map(|roots| {
                roots
                    .iter()
                    .map(|root| Self::build_node(root, &children_of))
                    .collect()
            })
            .unwrap_or_default()
    }

    // Only reachable from roots, so a stored cycle (which has no root) is never entered.
    fn build_node(
        category: &Category,
        children_of: &HashMap<Option<Uuid>, Vec<&Category>>,
    ) -> CategoryTreeDto {
        let children = children_of
            .get(&Some(category.id))
            .map(|kids| {
                kids.iter()
                    .map(|child| Self::build_node(child, children_of))
                    .collect()
            })
            .unwrap_or_default();

        CategoryTreeDto {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            sort_order: category.sort_order,
            is_active: category.is_active,
            product_count: category.product_count,
            children,
        }
    }
}

/// Query params for listing categories
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
    /// If true, include deactivated categories
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query params for exporting categories
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportCategoriesQuery {
    /// "csv" (default) or "json"
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub include_inactive: bool,
}

/// Flat export row
#[derive(Debug, Clone, Serialize)]
pub struct CategoryExportRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub sort_order: i32,
    pub is_active: bool,
    pub product_count: i64,
}

impl From<Category> for CategoryExportRow {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            parent_id: c.parent_id,
            sort_order: c.sort_order,
            is_active: c.is_active,
            product_count: c.product_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,

    /// Derived from the name when omitted
    #[validate(
        length(max = 140, message = "Slug must not exceed 140 characters"),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase letters, digits and single hyphens")
    )]
    pub slug: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    pub parent_id: Option<Uuid>,

    #[validate(range(min = 0, message = "Sort order must not be negative"))]
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(
        length(max = 140, message = "Slug must not exceed 140 characters"),
        regex(path = *SLUG_REGEX, message = "Slug must be lowercase letters, digits and single hyphens")
    )]
    pub slug: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
}

/// Reparent and/or reorder a category.
///
/// `parent_id` absent or null moves the category to the root. `sort_order`
/// absent keeps the current position.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct MoveCategoryDto {
    #[serde(default)]
    pub parent_id: Option<Uuid>,

    #[validate(range(min = 0, message = "Sort order must not be negative"))]
    pub sort_order: Option<i32>,
}
