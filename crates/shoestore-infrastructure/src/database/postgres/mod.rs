//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod catalog_repo_impl;
pub mod shopping_repo_impl;
pub mod order_repo_impl;
pub mod review_repo_impl;
pub mod report_repo_impl;
pub mod audit_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use catalog_repo_impl::{PgProductRepository, PgTaxonomyRepository};
pub use shopping_repo_impl::PgShoppingRepository;
pub use order_repo_impl::PgOrderRepository;
pub use review_repo_impl::PgReviewRepository;
pub use report_repo_impl::PgReportRepository;
pub use audit_repo_impl::PgAuditRepository;

use shoestore_core::error::DomainError;
use tracing::error;

/// Logs the failed operation and hides the driver error type from the core.
pub(crate) fn db_error(operation: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", operation, e);
    DomainError::DatabaseError(e.to_string())
}
