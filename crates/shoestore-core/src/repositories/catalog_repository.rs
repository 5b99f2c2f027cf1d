//! Catalog repository traits (ports)

use async_trait::async_trait;
use shoestore_shared::Pagination;

use crate::domain::{Product, ProductInput, ProductSize, Taxon, TaxonomyKind};
use crate::error::DomainError;

/// Brands and categories
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn list(&self, kind: TaxonomyKind) -> Result<Vec<Taxon>, DomainError>;
    async fn find(&self, kind: TaxonomyKind, id: i32) -> Result<Option<Taxon>, DomainError>;
    async fn create(&self, kind: TaxonomyKind, name: &str) -> Result<Taxon, DomainError>;
    async fn update(&self, kind: TaxonomyKind, id: i32, name: &str) -> Result<bool, DomainError>;
    async fn delete(&self, kind: TaxonomyKind, id: i32) -> Result<bool, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self, page: Pagination) -> Result<(Vec<Product>, i64), DomainError>;
    async fn find(&self, id: i32) -> Result<Option<Product>, DomainError>;
    async fn create(&self, input: &ProductInput) -> Result<Product, DomainError>;
    async fn update(&self, id: i32, input: &ProductInput) -> Result<bool, DomainError>;
    /// Removes the product and everything referencing its sizes in one transaction.
    /// Returns false when the product does not exist.
    async fn delete_cascade(&self, id: i32) -> Result<bool, DomainError>;
    async fn sizes(&self, product_id: i32) -> Result<Vec<ProductSize>, DomainError>;
    async fn update_size_quantity(&self, size_id: i32, quantity: i32) -> Result<bool, DomainError>;
}
