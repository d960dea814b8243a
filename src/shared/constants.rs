/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Full back-office access including the audit trail
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// Catalog and order management
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// AUDIT ACTIONS
// =============================================================================

pub const AUDIT_CATEGORY_CREATE: &str = "category.create";
pub const AUDIT_CATEGORY_UPDATE: &str = "category.update";
pub const AUDIT_CATEGORY_MOVE: &str = "category.move";
pub const AUDIT_CATEGORY_DEACTIVATE: &str = "category.deactivate";
pub const AUDIT_ORDER_STATUS_UPDATE: &str = "order.status_update";
