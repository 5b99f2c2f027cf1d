//! Key-value store for pending reset codes, keyed by e-mail

use async_trait::async_trait;

use crate::domain::ResetCode;
use crate::error::DomainError;

/// One code per e-mail. `set` replaces whatever was stored before.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ResetCodeStore: Send + Sync {
    async fn get(&self, email: &str) -> Result<Option<ResetCode>, DomainError>;
    async fn set(&self, code: ResetCode) -> Result<(), DomainError>;
    /// Marks the stored code used only while it is still `code` and unused.
    /// Returns false when it was replaced, removed or already used.
    async fn mark_used(&self, email: &str, code: &str) -> Result<bool, DomainError>;
    async fn delete(&self, email: &str) -> Result<(), DomainError>;
}
