//! Review repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shoestore_shared::Pagination;

use crate::domain::{Review, ReviewInput};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn list(&self, page: Pagination) -> Result<(Vec<Review>, i64), DomainError>;
    async fn for_product(&self, product_id: i32, page: Pagination) -> Result<(Vec<Review>, i64), DomainError>;
    async fn for_user(&self, user_id: i32, page: Pagination) -> Result<(Vec<Review>, i64), DomainError>;
    async fn find(&self, id: i32) -> Result<Option<Review>, DomainError>;

    /// True when one of the user's orders contains any size of the product
    async fn has_purchased(&self, user_id: i32, product_id: i32) -> Result<bool, DomainError>;
    async fn exists_for(&self, product_id: i32, user_id: i32) -> Result<bool, DomainError>;

    async fn create(
        &self,
        product_id: i32,
        user_id: i32,
        input: &ReviewInput,
        date: DateTime<Utc>,
    ) -> Result<Review, DomainError>;
    async fn update(&self, id: i32, input: &ReviewInput) -> Result<bool, DomainError>;
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
