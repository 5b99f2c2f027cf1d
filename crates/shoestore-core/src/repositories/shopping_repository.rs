//! Basket and favorites repository trait (port)

use async_trait::async_trait;

use crate::domain::{BasketEntry, BasketItem, Favorite, FavoriteItem};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ShoppingRepository: Send + Sync {
    async fn basket_for_user(&self, user_id: i32) -> Result<Vec<BasketItem>, DomainError>;
    async fn add_to_basket(&self, user_id: i32, product_size_id: i32, quantity: i32) -> Result<BasketEntry, DomainError>;
    async fn update_basket_quantity(&self, id: i32, quantity: i32) -> Result<bool, DomainError>;
    async fn remove_from_basket(&self, id: i32) -> Result<bool, DomainError>;

    async fn favorites_for_user(&self, user_id: i32) -> Result<Vec<FavoriteItem>, DomainError>;
    async fn add_favorite(&self, user_id: i32, product_size_id: i32) -> Result<Favorite, DomainError>;
    async fn remove_favorite(&self, id: i32) -> Result<bool, DomainError>;
}
