use std::sync::Arc;

use shoestore_core::audit::AuditLogger;
use shoestore_core::repositories::Repositories;
use shoestore_core::services::{
    AuthService, BackupService, OrderService, PasswordFlowService, ReportService, ReviewService,
    SupportService, UserService,
};
use shoestore_security::TokenService;
use shoestore_shared::config::AppConfig;
use shoestore_shared::Clock;

/// HTTP-layer knobs taken from the application config
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub transport_audit: bool,
    pub allowed_origins: Vec<String>,
    pub cors_max_age_secs: u64,
    pub max_upload_bytes: usize,
}

impl From<&AppConfig> for HttpSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            transport_audit: config.audit.transport_layer,
            allowed_origins: config.cors.allowed_origins.clone(),
            cors_max_age_secs: config.cors.max_age_secs,
            max_upload_bytes: config.backup.max_upload_mb * 1024 * 1024,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            transport_audit: true,
            allowed_origins: vec!["*".to_string()],
            cors_max_age_secs: 3600,
            max_upload_bytes: 100 * 1024 * 1024,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub tokens: Arc<TokenService>,
    pub audit: AuditLogger,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub passwords: Arc<PasswordFlowService>,
    pub reviews: Arc<ReviewService>,
    pub orders: Arc<OrderService>,
    pub reports: Arc<ReportService>,
    pub backups: Arc<BackupService>,
    pub support: Arc<SupportService>,
    pub clock: Arc<dyn Clock>,
    pub settings: Arc<HttpSettings>,
}
