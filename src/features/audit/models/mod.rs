mod audit_log;

pub use audit_log::{AuditFilter, AuditLog, NewAuditLog};
