//! Best-effort audit trail: a bounded queue drained by background workers.

pub mod logger;
pub mod types;

pub use logger::{AuditLogger, AuditLoggerConfig};
pub use types::AuditEvent;
