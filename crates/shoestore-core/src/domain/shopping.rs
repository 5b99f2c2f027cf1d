//! Basket and favorites

use serde::{Deserialize, Serialize};

/// Raw basket row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketEntry {
    pub id: i32,
    pub user_id: i32,
    pub product_size_id: i32,
    pub quantity: i32,
}

/// Basket row joined with product data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    pub id: i32,
    pub user_id: i32,
    pub product_size_id: i32,
    pub quantity: i32,
    pub product_id: i32,
    pub product_name: String,
    pub size: i32,
    pub available: i32,
    pub price: f64,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub product_size_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub id: i32,
    pub user_id: i32,
    pub product_size_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub size: i32,
    pub price: f64,
    pub image_url: String,
}
