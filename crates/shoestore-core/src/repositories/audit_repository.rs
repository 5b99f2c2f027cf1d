//! Audit log repository trait (port)

use async_trait::async_trait;
use shoestore_shared::Pagination;

use crate::domain::{AuditEntry, NewAuditEntry};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append-only insert. Returns the number of rows written.
    async fn insert_batch(&self, entries: &[NewAuditEntry]) -> Result<u64, DomainError>;
    async fn list(&self, page: Pagination) -> Result<(Vec<AuditEntry>, i64), DomainError>;
    async fn find(&self, id: i32) -> Result<Option<AuditEntry>, DomainError>;
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
    async fn exists(&self, action: &str, entity: &str, entity_id: i32) -> Result<bool, DomainError>;
}
