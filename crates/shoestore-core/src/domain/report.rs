//! Saved reports and the aggregates behind generated reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedReport {
    pub id: i32,
    pub report_name: String,
    pub report_type: String,
    pub report_data: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
    pub report_name: String,
    pub report_type: String,
    #[serde(default)]
    pub report_data: String,
    #[serde(default)]
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Sales,
    Inventory,
    Customers,
    Categories,
}

impl ReportKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sales" => Some(ReportKind::Sales),
            "inventory" => Some(ReportKind::Inventory),
            "customers" => Some(ReportKind::Customers),
            "categories" => Some(ReportKind::Categories),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Sales => "sales",
            ReportKind::Inventory => "inventory",
            ReportKind::Customers => "customers",
            ReportKind::Categories => "categories",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Sales => "SALES REPORT",
            ReportKind::Inventory => "INVENTORY REPORT",
            ReportKind::Customers => "CUSTOMER REPORT",
            ReportKind::Categories => "CATEGORY REPORT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Excel,
    Text,
}

impl ReportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pdf" => Some(ReportFormat::Pdf),
            "excel" => Some(ReportFormat::Excel),
            "text" => Some(ReportFormat::Text),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "xlsx",
            ReportFormat::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    /// Audit action recorded when a report is generated in this format
    pub fn audit_action(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "GENERATE_PDF",
            ReportFormat::Excel => "GENERATE_EXCEL",
            ReportFormat::Text => "GENERATE_TEXT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub total_sales: f64,
    pub total_orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_id: i32,
    pub product_name: String,
    pub total_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub category_id: i32,
    pub category_name: String,
    pub total_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockProduct {
    pub product_id: i32,
    pub product_name: String,
    pub current_stock: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCustomer {
    pub user_id: i32,
    pub user_name: String,
    pub total_orders: i64,
    pub total_spent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_format_parsing() {
        assert_eq!(ReportKind::parse("customers"), Some(ReportKind::Customers));
        assert_eq!(ReportKind::parse("orders"), None);
        assert_eq!(ReportFormat::parse("excel").map(|f| f.extension()), Some("xlsx"));
        assert_eq!(ReportFormat::parse("csv"), None);
    }
}
