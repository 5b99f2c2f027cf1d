//! # Shoe Store Core - Domain Module
//! 
//! Domain entities for the shoe store backend.

pub mod user;
pub mod catalog;
pub mod shopping;
pub mod order;
pub mod review;
pub mod report;
pub mod audit_entry;
pub mod reset_code;
pub mod backup;
pub mod support;

// Re-export all entities and enums
pub use user::{User, NewUser, UserChanges};
pub use catalog::{TaxonomyKind, Taxon, TaxonInput, Product, ProductInput, ProductSize};
pub use shopping::{BasketEntry, BasketItem, Favorite, FavoriteItem};
pub use order::{Order, OrderProduct, OrderLine};
pub use review::{Review, ReviewInput};
pub use report::{
    SavedReport, NewReport, ReportKind, ReportFormat,
    SalesSummary, ProductSales, CategorySales, LowStockProduct, TopCustomer,
};
pub use audit_entry::{AuditEntry, NewAuditEntry};
pub use reset_code::{ResetCode, CodeRejection};
pub use backup::{BackupFile, DatabaseParams};
pub use support::SupportMessage;
