//! Audit trail of back-office mutations.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/audit-logs` | Super admin | List audit entries |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgAuditRepository;
pub use services::AuditService;
