//! HTTP handlers grouped by resource

pub mod auth;
pub mod backup;
pub mod catalog;
pub mod general;
pub mod logs;
pub mod orders;
pub mod password;
pub mod reports;
pub mod reviews;
pub mod shopping;
pub mod support;
pub mod users;
