use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{ROLE_ADMIN, ROLE_SUPER_ADMIN};

/// Back-office operator resolved from a validated bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedAdmin {
    pub sub: String,
    pub roles: Vec<String>,
}

impl AuthenticatedAdmin {
    /// Check if admin has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(ROLE_SUPER_ADMIN)
    }

    /// Any back-office role (admin or super_admin)
    pub fn has_admin_access(&self) -> bool {
        self.is_super_admin() || self.has_role(ROLE_ADMIN)
    }
}
