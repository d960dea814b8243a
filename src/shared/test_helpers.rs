use crate::features::auth::model::AuthenticatedAdmin;
use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

use axum::{extract::Request, middleware::Next, response::Response, Router};

pub const TEST_ADMIN_SUB: &str = "test-admin";

pub fn create_admin(roles: &[&str]) -> AuthenticatedAdmin {
    AuthenticatedAdmin {
        sub: TEST_ADMIN_SUB.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin(&[ROLE_ADMIN]));
    next.run(request).await
}

async fn inject_super_admin_middleware(mut request: Request, next: Next) -> Response {
    request
        .extensions_mut()
        .insert(create_admin(&[ROLE_SUPER_ADMIN]));
    next.run(request).await
}

/// Wrap a router so every request carries a plain admin identity
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

pub fn with_super_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_super_admin_middleware))
}
