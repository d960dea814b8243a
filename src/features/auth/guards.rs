//! Role-based authorization guards for back-office routes.
//!
//! Role hierarchy (from highest to lowest):
//! - super_admin: everything, including the audit trail
//! - admin: catalog and order management

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedAdmin;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<&AuthenticatedAdmin, AppError> {
    parts
        .extensions
        .get::<AuthenticatedAdmin>()
        .ok_or_else(|| AppError::Unauthorized("Admin not authenticated".to_string()))
}

/// Guard for checking if the caller is a super admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireSuperAdmin(admin): RequireSuperAdmin) { ... }
/// ```
pub struct RequireSuperAdmin(pub AuthenticatedAdmin);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = authenticated(parts)?;

        if !admin.is_super_admin() {
            return Err(AppError::Forbidden(
                "Super admin access required".to_string(),
            ));
        }

        Ok(RequireSuperAdmin(admin.clone()))
    }
}

/// Guard for any back-office role (admin or super_admin).
pub struct RequireAdmin(pub AuthenticatedAdmin);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = authenticated(parts)?;

        if !admin.has_admin_access() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(admin.clone()))
    }
}
