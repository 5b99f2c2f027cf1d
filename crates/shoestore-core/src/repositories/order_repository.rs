//! Order repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shoestore_shared::Pagination;

use crate::domain::{Order, OrderLine, OrderProduct};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn list(&self, page: Pagination) -> Result<(Vec<Order>, i64), DomainError>;
    async fn list_for_user(&self, user_id: i32, page: Pagination) -> Result<(Vec<Order>, i64), DomainError>;
    async fn find(&self, id: i32) -> Result<Option<Order>, DomainError>;
    async fn create(&self, user_id: i32, order_date: DateTime<Utc>) -> Result<Order, DomainError>;

    async fn add_line(&self, order_id: i32, product_size_id: i32, quantity: i32) -> Result<OrderProduct, DomainError>;
    async fn list_lines(&self) -> Result<Vec<OrderProduct>, DomainError>;
    async fn lines_for_order(&self, order_id: i32) -> Result<Vec<OrderLine>, DomainError>;
    async fn update_line_quantity(&self, id: i32, quantity: i32) -> Result<bool, DomainError>;
    async fn count_lines(&self, order_id: i32) -> Result<i64, DomainError>;

    /// E-mail address of the customer who placed the order
    async fn recipient_email(&self, order_id: i32) -> Result<Option<String>, DomainError>;
}
