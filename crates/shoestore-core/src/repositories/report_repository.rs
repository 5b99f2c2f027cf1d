//! Report repository trait (port): saved reports and report aggregates

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CategorySales, LowStockProduct, NewReport, ProductSales, SalesSummary, SavedReport, TopCustomer,
};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: &NewReport, user_id: i32) -> Result<SavedReport, DomainError>;
    async fn list(&self) -> Result<Vec<SavedReport>, DomainError>;
    async fn find(&self, id: i32) -> Result<Option<SavedReport>, DomainError>;

    async fn sales_summary(&self, since: DateTime<Utc>) -> Result<SalesSummary, DomainError>;
    async fn top_products(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<ProductSales>, DomainError>;
    async fn category_sales(&self, since: DateTime<Utc>) -> Result<Vec<CategorySales>, DomainError>;

    async fn product_count(&self) -> Result<i64, DomainError>;
    /// Products having at least one size at or below the threshold
    async fn low_stock(&self, threshold: i32) -> Result<Vec<LowStockProduct>, DomainError>;

    async fn customer_count(&self) -> Result<i64, DomainError>;
    async fn top_customers(&self, limit: i64) -> Result<Vec<TopCustomer>, DomainError>;
}
