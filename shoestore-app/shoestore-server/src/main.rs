use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};

use shoestore_api::{build_router, AppState, HttpSettings};
use shoestore_core::audit::{AuditLogger, AuditLoggerConfig};
use shoestore_core::gateways::Mailer;
use shoestore_core::reports::{ReportRenderer, TextRenderer};
use shoestore_core::repositories::ResetCodeStore;
use shoestore_core::services::{
    AuthService, BackupService, MailTemplates, OrderService, PasswordFlowService, ReportService,
    ReviewService, SupportService, UserService,
};
use shoestore_infrastructure::{
    create_pool, postgres_repositories, InMemoryResetCodeStore, LettreMailer, PdfRenderer,
    RedisResetCodeStore, TokioCommandRunner, XlsxRenderer,
};
use shoestore_security::TokenService;
use shoestore_shared::config::AppConfig;
use shoestore_shared::telemetry::init_telemetry;
use shoestore_shared::{Clock, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry; the guard flushes file logs on exit
    let _log_guard = init_telemetry(&config.log)?;
    info!("{} starting ({})", config.app.name, config.app.env);

    // Connect to Database
    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection established.");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repos = postgres_repositories(pool);

    let audit = AuditLogger::new(
        repos.audit.clone(),
        clock.clone(),
        AuditLoggerConfig::from(&config.audit),
    );

    let codes: Arc<dyn ResetCodeStore> = match config.reset.store.as_str() {
        "redis" => {
            let url = config.reset.redis_url.as_deref().unwrap_or_default();
            Arc::new(RedisResetCodeStore::connect(url, clock.clone())?)
        }
        other => {
            if other != "memory" {
                warn!("Unknown reset code store '{}', using memory", other);
            }
            Arc::new(InMemoryResetCodeStore::new())
        }
    };

    let mut mail_settings = config.mail.clone();
    mail_settings.from = config.mail_from().to_string();
    let mailer: Arc<dyn Mailer> = Arc::new(LettreMailer::new(&mail_settings)?);
    let templates = Arc::new(MailTemplates::new()?);

    let admin_email = if config.mail.admin_email.is_empty() {
        config.mail_from().to_string()
    } else {
        config.mail.admin_email.clone()
    };

    let renderers: Vec<Arc<dyn ReportRenderer>> = vec![
        Arc::new(PdfRenderer) as Arc<dyn ReportRenderer>,
        Arc::new(XlsxRenderer),
        Arc::new(TextRenderer),
    ];

    let tokens = Arc::new(TokenService::new(
        &config.jwt.secret,
        config.jwt.token_ttl_hours,
        clock.clone(),
    ));

    let state = AppState {
        auth: Arc::new(AuthService::new(repos.users.clone(), tokens.clone())),
        users: Arc::new(UserService::new(repos.users.clone())),
        passwords: Arc::new(PasswordFlowService::new(
            repos.users.clone(),
            codes,
            mailer.clone(),
            templates.clone(),
            clock.clone(),
            config.reset.code_ttl_minutes,
        )),
        reviews: Arc::new(ReviewService::new(repos.reviews.clone(), clock.clone())),
        orders: Arc::new(OrderService::new(
            repos.orders.clone(),
            repos.audit.clone(),
            mailer.clone(),
            templates.clone(),
            clock.clone(),
            Duration::from_secs(config.notifications.order_email_delay_secs),
        )),
        reports: Arc::new(ReportService::new(repos.reports.clone(), renderers, clock.clone())),
        backups: Arc::new(BackupService::new(
            Arc::new(TokioCommandRunner::new()),
            clock.clone(),
            &config.backup.directory,
            &config.backup.pg_dump_path,
            &config.backup.psql_path,
            &config.database.url,
        )),
        support: Arc::new(SupportService::new(mailer, templates, clock.clone(), admin_email)),
        repos,
        tokens,
        audit: audit.clone(),
        clock,
        settings: Arc::new(HttpSettings::from(&config)),
    };

    let app = build_router(state);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain pending audit entries before exit
    let timeout = Duration::from_secs(config.audit.shutdown_timeout_secs);
    if !audit.shutdown(timeout).await {
        error!("Audit entries were lost during shutdown");
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
