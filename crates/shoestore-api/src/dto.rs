//! Request payloads that have no domain counterpart

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shoestore_core::domain::BackupFile;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Owner defaults to the caller when `user_id` is absent
#[derive(Debug, Deserialize)]
pub struct BasketRequest {
    #[serde(default)]
    pub user_id: Option<i32>,
    pub product_size_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    #[serde(default)]
    pub user_id: Option<i32>,
    pub product_size_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct OrderProductRequest {
    pub order_id: i32,
    pub product_size_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub product_id: i32,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetConfirmRequest {
    pub email: String,
    pub code: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeConfirmRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SupportResponse {
    pub message: String,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BackupCreated {
    pub message: String,
    pub success: bool,
    pub file_path: String,
}

#[derive(Debug, Serialize)]
pub struct BackupInfo {
    pub backup_files: Vec<BackupFile>,
    pub total_files: usize,
    pub backup_directory: String,
}
