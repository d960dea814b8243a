use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::audit::{dtos as audit_dtos, handlers as audit_handlers};
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::orders::{
    dtos as orders_dtos, handlers as orders_handlers, models as orders_models,
};
use crate::shared::export::ExportFormat;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::move_category,
        categories_handlers::deactivate_category,
        categories_handlers::export_categories,
        // Orders
        orders_handlers::list_orders,
        orders_handlers::get_order,
        orders_handlers::update_order_status,
        orders_handlers::get_order_transitions,
        orders_handlers::export_orders,
        // Audit
        audit_handlers::list_audit_logs,
    ),
    components(
        schemas(
            // Shared
            Meta,
            ExportFormat,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryRefDto,
            categories_dtos::CategoryDetailDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::MoveCategoryDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::CategoryDetailDto>,
            // Orders
            orders_models::OrderStatus,
            orders_models::PaymentStatus,
            orders_dtos::OrderResponseDto,
            orders_dtos::OrderItemDto,
            orders_dtos::OrderDetailDto,
            orders_dtos::OrderTransitionsDto,
            orders_dtos::UpdateOrderStatusDto,
            ApiResponse<Vec<orders_dtos::OrderResponseDto>>,
            ApiResponse<orders_dtos::OrderResponseDto>,
            ApiResponse<orders_dtos::OrderDetailDto>,
            ApiResponse<orders_dtos::OrderTransitionsDto>,
            // Audit
            audit_dtos::AuditLogResponseDto,
            ApiResponse<Vec<audit_dtos::AuditLogResponseDto>>,
        )
    ),
    tags(
        (name = "categories", description = "Category tree management"),
        (name = "orders", description = "Order browsing and status lifecycle"),
        (name = "audit", description = "Audit trail of back-office changes (super admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Commerce Admin API",
        version = "0.1.0",
        description = "Back-office API for catalog and order management",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
