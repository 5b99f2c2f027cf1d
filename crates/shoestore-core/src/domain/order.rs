//! Orders and order lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProduct {
    pub id: i32,
    pub order_id: i32,
    pub product_size_id: i32,
    pub quantity: i32,
}

/// Order line joined with product data, used by the confirmation mail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub product_size_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub size: i32,
    pub quantity: i32,
    pub price: f64,
    pub image_url: String,
}

impl OrderLine {
    pub fn total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}
