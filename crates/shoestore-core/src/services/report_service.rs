//! Report generation: aggregates from storage laid out by a format renderer

use std::sync::Arc;

use chrono::Duration;
use shoestore_shared::constants::{LOW_STOCK_THRESHOLD, REPORT_TOP_LIMIT, REPORT_WINDOW_DAYS};
use shoestore_shared::Clock;
use tracing::info;

use crate::domain::{NewReport, ReportFormat, ReportKind, SavedReport};
use crate::error::DomainError;
use crate::reports::{ReportDocument, ReportRenderer, ReportTable};
use crate::repositories::ReportRepository;

/// Rendered report ready to be sent as an attachment
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    renderers: Vec<Arc<dyn ReportRenderer>>,
    clock: Arc<dyn Clock>,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        renderers: Vec<Arc<dyn ReportRenderer>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { reports, renderers, clock }
    }

    pub async fn save(&self, report: NewReport, user_id: i32) -> Result<SavedReport, DomainError> {
        if report.report_name.trim().is_empty() || report.report_type.trim().is_empty() {
            return Err(DomainError::ValidationError("report_name and report_type are required".into()));
        }
        self.reports.create(&report, user_id).await
    }

    pub async fn generate(&self, kind: ReportKind, format: ReportFormat) -> Result<GeneratedReport, DomainError> {
        let renderer = self
            .renderers
            .iter()
            .find(|r| r.format() == format)
            .ok_or_else(|| DomainError::InternalError(format!("no renderer for {:?}", format)))?;

        let document = self.build(kind).await?;
        let bytes = renderer.render(&document)?;

        info!("Generated {} report as {:?} ({} bytes)", kind.as_str(), format, bytes.len());
        Ok(GeneratedReport {
            filename: format!("{}_report.{}", kind.as_str(), format.extension()),
            content_type: format.content_type(),
            bytes,
        })
    }

    /// Collects the data for one report kind.
    pub async fn build(&self, kind: ReportKind) -> Result<ReportDocument, DomainError> {
        let since = self.clock.now() - Duration::days(REPORT_WINDOW_DAYS);
        let period = format!("Last {} days", REPORT_WINDOW_DAYS);

        let document = match kind {
            ReportKind::Sales => {
                let summary = self.reports.sales_summary(since).await?;
                let products = self.reports.top_products(since, REPORT_TOP_LIMIT).await?;

                let mut table = ReportTable::new("TOP PRODUCTS", &["Product", "Units sold", "Revenue"]);
                for p in products {
                    table.row(vec![p.product_name, p.total_sold.to_string(), money(p.total_revenue)]);
                }
                ReportDocument::new(kind.title())
                    .fact("Total revenue", money(summary.total_sales))
                    .fact("Total orders", summary.total_orders)
                    .fact("Period", period)
                    .table(table)
            }
            ReportKind::Inventory => {
                let total = self.reports.product_count().await?;
                let low = self.reports.low_stock(LOW_STOCK_THRESHOLD).await?;

                let mut table = ReportTable::new(
                    "LOW STOCK PRODUCTS",
                    &["Product ID", "Product", "Current stock", "Minimum stock"],
                );
                let low_count = low.len();
                for p in low {
                    table.row(vec![
                        p.product_id.to_string(),
                        p.product_name,
                        p.current_stock.to_string(),
                        LOW_STOCK_THRESHOLD.to_string(),
                    ]);
                }
                ReportDocument::new(kind.title())
                    .fact("Total products", total)
                    .fact("Low stock products", low_count)
                    .table(table)
            }
            ReportKind::Customers => {
                let total = self.reports.customer_count().await?;
                let top = self.reports.top_customers(REPORT_TOP_LIMIT).await?;

                let mut table = ReportTable::new("TOP CUSTOMERS", &["Customer", "Orders", "Total spent"]);
                for c in top {
                    table.row(vec![c.user_name, c.total_orders.to_string(), money(c.total_spent)]);
                }
                ReportDocument::new(kind.title())
                    .fact("Total customers", total)
                    .table(table)
            }
            ReportKind::Categories => {
                let categories = self.reports.category_sales(since).await?;

                let mut table = ReportTable::new("REVENUE BY CATEGORY", &["Category", "Units sold", "Revenue"]);
                for c in categories {
                    table.row(vec![c.category_name, c.total_sold.to_string(), money(c.total_revenue)]);
                }
                ReportDocument::new(kind.title()).fact("Period", period).table(table)
            }
        };
        Ok(document)
    }
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LowStockProduct, ProductSales, SalesSummary, TopCustomer};
    use crate::reports::TextRenderer;
    use crate::repositories::MockReportRepository;
    use chrono::{TimeZone, Utc};
    use shoestore_shared::ManualClock;

    fn service(repo: MockReportRepository) -> ReportService {
        let now = Utc.with_ymd_and_hms(2024, 7, 31, 0, 0, 0).unwrap();
        ReportService::new(
            Arc::new(repo),
            vec![Arc::new(TextRenderer)],
            Arc::new(ManualClock::new(now)),
        )
    }

    #[tokio::test]
    async fn test_sales_report_uses_thirty_day_window() {
        let mut repo = MockReportRepository::new();
        repo.expect_sales_summary()
            .withf(|since| *since == Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap())
            .returning(|_| Ok(SalesSummary { total_sales: 250.5, total_orders: 3 }));
        repo.expect_top_products()
            .withf(|_, limit| *limit == 10)
            .returning(|_, _| {
                Ok(vec![ProductSales {
                    product_id: 1,
                    product_name: "Runner".into(),
                    total_sold: 5,
                    total_revenue: 250.5,
                }])
            });

        let report = service(repo).generate(ReportKind::Sales, ReportFormat::Text).await.unwrap();
        assert_eq!(report.filename, "sales_report.txt");
        let text = String::from_utf8(report.bytes).unwrap();
        assert!(text.starts_with("=== SALES REPORT ===\n\n"));
        assert!(text.contains("Total revenue: 250.50"));
        assert!(text.contains("- Runner | 5 | 250.50"));
        assert!(text.ends_with("--- End of Report ---"));
    }

    #[tokio::test]
    async fn test_inventory_threshold() {
        let mut repo = MockReportRepository::new();
        repo.expect_product_count().returning(|| Ok(12));
        repo.expect_low_stock().withf(|t| *t == 5).returning(|_| {
            Ok(vec![LowStockProduct { product_id: 3, product_name: "Boot".into(), current_stock: 1 }])
        });

        let doc = service(repo).build(ReportKind::Inventory).await.unwrap();
        assert!(doc.body_lines().contains(&"Low stock products: 1".to_string()));
    }

    #[tokio::test]
    async fn test_customers_report() {
        let mut repo = MockReportRepository::new();
        repo.expect_customer_count().returning(|| Ok(40));
        repo.expect_top_customers().returning(|_| {
            Ok(vec![TopCustomer { user_id: 2, user_name: "Ann".into(), total_orders: 4, total_spent: 99.0 }])
        });

        let doc = service(repo).build(ReportKind::Customers).await.unwrap();
        assert_eq!(doc.summary, vec![("Total customers".to_string(), "40".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_renderer() {
        let repo = MockReportRepository::new();
        let err = service(repo).generate(ReportKind::Sales, ReportFormat::Pdf).await.unwrap_err();
        assert!(matches!(err, DomainError::InternalError(_)));
    }
}
