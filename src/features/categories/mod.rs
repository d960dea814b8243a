//! Product category tree.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/categories` | Admin | Flat list or tree (`?tree=true`) |
//! | POST | `/api/admin/categories` | Admin | Create category |
//! | GET | `/api/admin/categories/{id}` | Admin | Category with breadcrumb |
//! | PUT | `/api/admin/categories/{id}` | Admin | Update name, slug, description |
//! | DELETE | `/api/admin/categories/{id}` | Admin | Deactivate |
//! | PATCH | `/api/admin/categories/{id}/move` | Admin | Reparent and/or reorder |
//! | GET | `/api/admin/categories/export` | Admin | CSV/JSON download |

pub mod dtos;
pub mod handlers;
pub mod hierarchy;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::PgCategoryRepository;
pub use services::CategoryService;
