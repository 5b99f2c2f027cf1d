//! Domain services (business logic)

pub mod templates;
pub mod auth_service;
pub mod user_service;
pub mod password_service;
pub mod review_service;
pub mod order_service;
pub mod report_service;
pub mod backup_service;
pub mod support_service;

pub use templates::MailTemplates;
pub use auth_service::{AuthService, LoginResult};
pub use user_service::UserService;
pub use password_service::PasswordFlowService;
pub use review_service::ReviewService;
pub use order_service::{OrderService, EMAIL_SENT};
pub use report_service::{GeneratedReport, ReportService};
pub use backup_service::BackupService;
pub use support_service::SupportService;
