mod audit_repository;
#[cfg(test)]
pub mod in_memory;

pub use audit_repository::{AuditRepository, PgAuditRepository};

#[cfg(test)]
pub use audit_repository::MockAuditRepository;
