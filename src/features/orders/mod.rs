//! Order browsing and status lifecycle.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/orders` | Admin | Paginated list, filter by status/customer |
//! | GET | `/api/admin/orders/{id}` | Admin | Order with line items |
//! | PATCH | `/api/admin/orders/{id}/status` | Admin | Status transition |
//! | GET | `/api/admin/orders/{id}/transitions` | Admin | Allowed next statuses |
//! | GET | `/api/admin/orders/export` | Admin | CSV/JSON download |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgOrderRepository;
pub use services::OrderService;
