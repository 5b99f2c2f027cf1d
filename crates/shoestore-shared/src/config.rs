//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub mail: MailSettings,
    pub audit: AuditSettings,
    pub reset: ResetSettings,
    pub backup: BackupSettings,
    pub cors: CorsSettings,
    pub notifications: NotificationSettings,
    pub log: LogSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub admin_email: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditSettings {
    pub queue_capacity: usize,
    pub batch_size: usize,
    pub batch_timeout_ms: u64,
    pub worker_count: usize,
    pub transport_layer: bool,
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResetSettings {
    pub code_ttl_minutes: i64,
    pub store: String,
    pub redis_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackupSettings {
    pub directory: String,
    pub pg_dump_path: String,
    pub psql_path: String,
    pub max_upload_mb: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub max_age_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub order_email_delay_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub format: String,
    pub directory: Option<String>,
}

impl AppConfig {
    /// Loads defaults, `config/default`, `config/{APP_ENV}` and `SECTION__KEY` env vars,
    /// then rejects configurations without credentials.
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::builder(&env)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn builder(env: &str) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", env)?
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "shoestore-server")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("jwt.secret", "")?
            .set_default("jwt.token_ttl_hours", crate::constants::DEFAULT_TOKEN_TTL_HOURS)?
            .set_default("mail.smtp_host", "")?
            .set_default("mail.smtp_port", 587)?
            .set_default("mail.username", "")?
            .set_default("mail.password", "")?
            .set_default("mail.from", "")?
            .set_default("mail.admin_email", "")?
            .set_default("mail.timeout_secs", 10)?
            .set_default("audit.queue_capacity", 10_000)?
            .set_default("audit.batch_size", 100)?
            .set_default("audit.batch_timeout_ms", 1000)?
            .set_default("audit.worker_count", 2)?
            .set_default("audit.transport_layer", true)?
            .set_default("audit.shutdown_timeout_secs", 5)?
            .set_default("reset.code_ttl_minutes", crate::constants::DEFAULT_RESET_CODE_TTL_MINUTES)?
            .set_default("reset.store", "memory")?
            .set_default("backup.directory", "backups")?
            .set_default("backup.pg_dump_path", "pg_dump")?
            .set_default("backup.psql_path", "psql")?
            .set_default("backup.max_upload_mb", 100)?
            .set_default("cors.allowed_origins", vec!["*"])?
            .set_default("cors.max_age_secs", 3600)?
            .set_default("notifications.order_email_delay_secs", 2)?
            .set_default("log.format", "json")
    }

    /// Secrets have no fallback values; an empty one is a startup failure.
    pub fn validate(&self) -> Result<(), AppError> {
        let required: [(&'static str, &str); 5] = [
            ("database.url", &self.database.url),
            ("jwt.secret", &self.jwt.secret),
            ("mail.smtp_host", &self.mail.smtp_host),
            ("mail.username", &self.mail.username),
            ("mail.password", &self.mail.password),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::MissingSetting(key));
            }
        }
        if self.reset.store == "redis" && self.reset.redis_url.as_deref().map_or(true, str::is_empty) {
            return Err(AppError::MissingSetting("reset.redis_url"));
        }
        Ok(())
    }

    /// Sender address, falling back to the SMTP login.
    pub fn mail_from(&self) -> &str {
        if self.mail.from.is_empty() {
            &self.mail.username
        } else {
            &self.mail.from
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AppConfig {
        let config = AppConfig::builder("test")
            .and_then(|b| {
                b.set_override("database.url", "postgres://u:p@localhost/db")?
                    .set_override("jwt.secret", "top-secret")?
                    .set_override("mail.smtp_host", "smtp.example.com")?
                    .set_override("mail.username", "store@example.com")?
                    .set_override("mail.password", "hunter22")?
                    .build()
            })
            .unwrap();
        config.try_deserialize().unwrap()
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = base();
        assert_eq!(config.jwt.token_ttl_hours, 24);
        assert_eq!(config.reset.code_ttl_minutes, 10);
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
        assert!(config.audit.transport_layer);
        assert!(config.validate().is_ok());
        assert_eq!(config.mail_from(), "store@example.com");
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let mut config = base();
        config.jwt.secret = "  ".into();
        assert!(matches!(config.validate(), Err(AppError::MissingSetting("jwt.secret"))));
    }

    #[test]
    fn test_missing_mail_password_is_fatal() {
        let mut config = base();
        config.mail.password.clear();
        assert!(matches!(config.validate(), Err(AppError::MissingSetting("mail.password"))));
    }

    #[test]
    fn test_redis_store_requires_url() {
        let mut config = base();
        config.reset.store = "redis".into();
        assert!(matches!(config.validate(), Err(AppError::MissingSetting("reset.redis_url"))));
    }
}
