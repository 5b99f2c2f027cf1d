//! User repository trait (port)

use async_trait::async_trait;
use shoestore_shared::Pagination;

use crate::domain::User;
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn list(&self, page: Pagination) -> Result<(Vec<User>, i64), DomainError>;
    /// Inserts the user and returns it with its assigned id.
    async fn create(&self, user: &User) -> Result<User, DomainError>;
    /// Overwrites name, email, role and hash. Returns false if the row is absent.
    async fn update(&self, user: &User) -> Result<bool, DomainError>;
    async fn update_password(&self, id: i32, password_hash: &str) -> Result<bool, DomainError>;
    async fn update_password_by_email(&self, email: &str, password_hash: &str) -> Result<bool, DomainError>;
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
