use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto,
    ExportCategoriesQuery, ListCategoriesQuery, MoveCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::export::export_response;
use crate::shared::types::{ApiResponse, Meta};

/// List categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "Flat list, or nested roots when tree=true", body = ApiResponse<Vec<CategoryResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn list_categories(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>> {
    let (value, total) = if query.tree {
        let tree: Vec<CategoryTreeDto> = service.list_tree(query.include_inactive).await?;
        let total = tree.len() as i64;
        (serde_json::to_value(tree), total)
    } else {
        let categories = service.list(query.include_inactive).await?;
        let total = categories.len() as i64;
        (serde_json::to_value(categories), total)
    };
    let value = value.map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(
        Some(value),
        None,
        Some(Meta { total }),
    )))
}

/// Get category by ID, with breadcrumb
#[utoipa::path(
    get,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn get_category(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Parent category not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    dto.validate()?;

    let category = service.create(dto, &admin.sub).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category),
            Some("Category created".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()?;

    let category = service.update(id, dto, &admin.sub).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Move a category under a new parent (or to the root) and/or reorder it
///
/// Rejected with 400 when the target parent is the category itself or one of
/// its descendants.
#[utoipa::path(
    patch,
    path = "/api/admin/categories/{id}/move",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = MoveCategoryDto,
    responses(
        (status = 200, description = "Category moved", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Invalid parent or circular reference"),
        (status = 404, description = "Category or parent not found")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn move_category(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<MoveCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()?;

    let category = service.move_category(id, dto, &admin.sub).await?;
    Ok(Json(ApiResponse::success(
        Some(category),
        Some("Category moved".to_string()),
        None,
    )))
}

/// Deactivate a category (soft delete)
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deactivated", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has active children or products")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn deactivate_category(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.deactivate(id, &admin.sub).await?;
    Ok(Json(ApiResponse::success(
        Some(category),
        Some("Category deactivated".to_string()),
        None,
    )))
}

/// Download categories as CSV or JSON
#[utoipa::path(
    get,
    path = "/api/admin/categories/export",
    params(ExportCategoriesQuery),
    responses(
        (status = 200, description = "File download", body = String, content_type = "text/csv"),
        (status = 400, description = "Unknown format")
    ),
    tag = "categories",
    security(("bearer_auth" = []))
)]
pub async fn export_categories(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<ExportCategoriesQuery>,
) -> Result<Response> {
    let rows = service.export_rows(query.include_inactive).await?;
    export_response("categories", query.format, &rows)
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::features::audit::repositories::in_memory::InMemoryAuditRepository;
    use crate::features::audit::AuditService;
    use crate::features::categories::models::Category;
    use crate::features::categories::repositories::in_memory::{
        category, InMemoryCategoryRepository,
    };
    use crate::features::categories::routes;
    use crate::features::categories::services::CategoryService;
    use crate::shared::test_helpers::{with_admin_auth, TEST_ADMIN_SUB};

    use std::sync::Arc;

    struct Harness {
        server: TestServer,
        audit: Arc<InMemoryAuditRepository>,
    }

    fn harness(categories: Vec<Category>) -> Harness {
        let audit = Arc::new(InMemoryAuditRepository::default());
        let service = Arc::new(CategoryService::new(
            Arc::new(InMemoryCategoryRepository::with(categories)),
            Arc::new(AuditService::new(audit.clone())),
        ));
        let app = with_admin_auth(Router::new().nest("/api/admin", routes::routes(service)));
        Harness {
            server: TestServer::new(app).unwrap(),
            audit,
        }
    }

    #[tokio::test]
    async fn test_move_under_self_returns_400() {
        let a = category("A", None);
        let h = harness(vec![a.clone()]);

        let response = h
            .server
            .patch(&format!("/api/admin/categories/{}/move", a.id))
            .json(&json!({ "parent_id": a.id }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Category cannot be its own parent");
        assert!(h.audit.entries().is_empty());
    }

    #[tokio::test]
    async fn test_move_under_descendant_returns_400_and_leaves_tree_unchanged() {
        let root = category("Root", None);
        let child = category("Child", Some(root.id));
        let grandchild = category("Grandchild", Some(child.id));
        let h = harness(vec![root.clone(), child.clone(), grandchild.clone()]);

        let response = h
            .server
            .patch(&format!("/api/admin/categories/{}/move", root.id))
            .json(&json!({ "parent_id": grandchild.id }))
            .await;
        response.assert_status_bad_request();

        let detail: Value = h
            .server
            .get(&format!("/api/admin/categories/{}", root.id))
            .await
            .json();
        assert_eq!(detail["data"]["parent_id"], Value::Null);
    }

    #[tokio::test]
    async fn test_valid_move_sets_parent_and_records_audit() {
        let root = category("Root", None);
        let a = category("A", Some(root.id));
        let b = category("B", Some(root.id));
        let h = harness(vec![root, a.clone(), b.clone()]);

        let response = h
            .server
            .patch(&format!("/api/admin/categories/{}/move", a.id))
            .json(&json!({ "parent_id": b.id, "sort_order": 2 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["parent_id"], json!(b.id));
        assert_eq!(body["data"]["sort_order"], 2);

        let entries = h.audit.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor, TEST_ADMIN_SUB);
        assert_eq!(entries[0].entity_id, a.id);
    }

    #[tokio::test]
    async fn test_move_with_null_parent_goes_to_root() {
        let root = category("Root", None);
        let a = category("A", Some(root.id));
        let h = harness(vec![root, a.clone()]);

        let response = h
            .server
            .patch(&format!("/api/admin/categories/{}/move", a.id))
            .json(&json!({ "parent_id": null, "sort_order": 5 }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["parent_id"], Value::Null);
        assert_eq!(body["data"]["sort_order"], 5);
    }

    #[tokio::test]
    async fn test_move_unknown_category_returns_404() {
        let h = harness(vec![]);
        let response = h
            .server
            .patch(&format!("/api/admin/categories/{}/move", uuid::Uuid::new_v4()))
            .json(&json!({}))
            .await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_move_rejects_negative_sort_order() {
        let a = category("A", None);
        let h = harness(vec![a.clone()]);
        let response = h
            .server
            .patch(&format!("/api/admin/categories/{}/move", a.id))
            .json(&json!({ "sort_order": -1 }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_create_then_list_as_tree() {
        let root = category("Apparel", None);
        let h = harness(vec![root.clone()]);

        let response = h
            .server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Rain Boots", "parent_id": root.id }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["data"]["slug"], "rain-boots");

        let tree: Value = h
            .server
            .get("/api/admin/categories")
            .add_query_param("tree", true)
            .await
            .json();
        assert_eq!(tree["data"][0]["name"], "Apparel");
        assert_eq!(tree["data"][0]["children"][0]["name"], "Rain Boots");
    }

    #[tokio::test]
    async fn test_create_with_duplicate_slug_returns_409() {
        let h = harness(vec![category("Shoes", None)]);
        let response = h
            .server
            .post("/api/admin/categories")
            .json(&json!({ "name": "Shoes" }))
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_deactivate_parent_with_active_child_returns_409() {
        let root = category("Root", None);
        let child = category("Child", Some(root.id));
        let h = harness(vec![root.clone(), child.clone()]);

        h.server
            .delete(&format!("/api/admin/categories/{}", root.id))
            .await
            .assert_status(axum::http::StatusCode::CONFLICT);

        h.server
            .delete(&format!("/api/admin/categories/{}", child.id))
            .await
            .assert_status_ok();

        let list: Value = h.server.get("/api/admin/categories").await.json();
        assert_eq!(list["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let h = harness(vec![category("Shoes", None)]);
        let response = h
            .server
            .get("/api/admin/categories/export")
            .add_query_param("format", "csv")
            .await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.starts_with("id,name,slug,parent_id,sort_order,is_active,product_count"));
        assert!(text.contains(",Shoes,shoes,"));
    }

    #[tokio::test]
    async fn test_export_unknown_format_returns_400() {
        let h = harness(vec![]);
        h.server
            .get("/api/admin/categories/export")
            .add_query_param("format", "xml")
            .await
            .assert_status_bad_request();
    }
}
