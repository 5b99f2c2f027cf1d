//! Repository traits (ports)

pub mod user_repository;
pub mod catalog_repository;
pub mod shopping_repository;
pub mod order_repository;
pub mod review_repository;
pub mod report_repository;
pub mod audit_repository;
pub mod reset_code_store;

use std::sync::Arc;

pub use user_repository::UserRepository;
pub use catalog_repository::{TaxonomyRepository, ProductRepository};
pub use shopping_repository::ShoppingRepository;
pub use order_repository::OrderRepository;
pub use review_repository::ReviewRepository;
pub use report_repository::ReportRepository;
pub use audit_repository::AuditRepository;
pub use reset_code_store::ResetCodeStore;

#[cfg(any(test, feature = "mocks"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "mocks"))]
pub use catalog_repository::{MockTaxonomyRepository, MockProductRepository};
#[cfg(any(test, feature = "mocks"))]
pub use shopping_repository::MockShoppingRepository;
#[cfg(any(test, feature = "mocks"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "mocks"))]
pub use review_repository::MockReviewRepository;
#[cfg(any(test, feature = "mocks"))]
pub use report_repository::MockReportRepository;
#[cfg(any(test, feature = "mocks"))]
pub use audit_repository::MockAuditRepository;
#[cfg(any(test, feature = "mocks"))]
pub use reset_code_store::MockResetCodeStore;

/// Every storage port the handlers need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub taxonomies: Arc<dyn TaxonomyRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub shopping: Arc<dyn ShoppingRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub reports: Arc<dyn ReportRepository>,
    pub audit: Arc<dyn AuditRepository>,
}
