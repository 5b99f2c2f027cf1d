//! Router tests: authentication, role gates, ownership and the two audit paths

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use mockall::predicate::eq;
use parking_lot::Mutex;
use tower::ServiceExt;

use shoestore_core::audit::{AuditLogger, AuditLoggerConfig};
use shoestore_core::domain::{AuditEntry, NewAuditEntry, Taxon};
use shoestore_core::gateways::{MockCommandRunner, MockMailer};
use shoestore_core::repositories::{
    AuditRepository, MockOrderRepository, MockProductRepository, MockReportRepository,
    MockResetCodeStore, MockReviewRepository, MockShoppingRepository, MockTaxonomyRepository,
    MockUserRepository, Repositories,
};
use shoestore_core::services::{
    AuthService, BackupService, MailTemplates, OrderService, PasswordFlowService, ReportService,
    ReviewService, SupportService, UserService,
};
use shoestore_core::DomainError;
use shoestore_security::{Role, TokenService};
use shoestore_shared::{Clock, Pagination, SystemClock};

use crate::{build_router, AppState, HttpSettings};

#[derive(Default)]
struct RecordingAudit {
    entries: Mutex<Vec<NewAuditEntry>>,
}

#[async_trait]
impl AuditRepository for RecordingAudit {
    async fn insert_batch(&self, entries: &[NewAuditEntry]) -> Result<u64, DomainError> {
        self.entries.lock().extend_from_slice(entries);
        Ok(entries.len() as u64)
    }

    async fn list(&self, _page: Pagination) -> Result<(Vec<AuditEntry>, i64), DomainError> {
        Ok((Vec::new(), 0))
    }

    async fn find(&self, _id: i32) -> Result<Option<AuditEntry>, DomainError> {
        Ok(None)
    }

    async fn delete(&self, _id: i32) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn exists(&self, _action: &str, _entity: &str, _entity_id: i32) -> Result<bool, DomainError> {
        Ok(false)
    }
}

/// Mocks without expectations panic when touched.
struct Mocks {
    taxonomies: MockTaxonomyRepository,
    products: MockProductRepository,
    shopping: MockShoppingRepository,
    reports: MockReportRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            taxonomies: MockTaxonomyRepository::new(),
            products: MockProductRepository::new(),
            shopping: MockShoppingRepository::new(),
            reports: MockReportRepository::new(),
        }
    }
}

struct Harness {
    app: Router,
    tokens: Arc<TokenService>,
    audit: AuditLogger,
    recorded: Arc<RecordingAudit>,
}

impl Harness {
    fn new(mocks: Mocks, settings: HttpSettings) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let recorded = Arc::new(RecordingAudit::default());
        let audit_repo: Arc<dyn AuditRepository> = recorded.clone();
        let audit = AuditLogger::new(
            audit_repo.clone(),
            clock.clone(),
            AuditLoggerConfig { batch_timeout_ms: 10, ..Default::default() },
        );

        let repos = Repositories {
            users: Arc::new(MockUserRepository::new()),
            taxonomies: Arc::new(mocks.taxonomies),
            products: Arc::new(mocks.products),
            shopping: Arc::new(mocks.shopping),
            orders: Arc::new(MockOrderRepository::new()),
            reviews: Arc::new(MockReviewRepository::new()),
            reports: Arc::new(mocks.reports),
            audit: audit_repo.clone(),
        };

        let tokens = Arc::new(TokenService::new("test-secret", 24, clock.clone()));
        let templates = Arc::new(MailTemplates::new().unwrap());
        let mailer = Arc::new(MockMailer::new());

        let state = AppState {
            auth: Arc::new(AuthService::new(repos.users.clone(), tokens.clone())),
            users: Arc::new(UserService::new(repos.users.clone())),
            passwords: Arc::new(PasswordFlowService::new(
                repos.users.clone(),
                Arc::new(MockResetCodeStore::new()),
                mailer.clone(),
                templates.clone(),
                clock.clone(),
                10,
            )),
            reviews: Arc::new(ReviewService::new(repos.reviews.clone(), clock.clone())),
            orders: Arc::new(OrderService::new(
                repos.orders.clone(),
                audit_repo,
                mailer.clone(),
                templates.clone(),
                clock.clone(),
                Duration::from_secs(60),
            )),
            reports: Arc::new(ReportService::new(repos.reports.clone(), Vec::new(), clock.clone())),
            backups: Arc::new(BackupService::new(
                Arc::new(MockCommandRunner::new()),
                clock.clone(),
                std::env::temp_dir().join("shoestore-api-tests"),
                "pg_dump",
                "psql",
                "postgres://u:p@localhost/db",
            )),
            support: Arc::new(SupportService::new(mailer, templates, clock.clone(), "admin@example.com")),
            repos,
            tokens: tokens.clone(),
            audit: audit.clone(),
            clock,
            settings: Arc::new(settings),
        };

        Self { app: build_router(state), tokens, audit, recorded }
    }

    fn bearer(&self, user_id: i32, role: Role) -> String {
        format!("Bearer {}", self.tokens.issue(user_id, role).unwrap())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    /// Drains the audit queue and returns everything that reached storage.
    async fn audit_entries(&self) -> Vec<NewAuditEntry> {
        assert!(self.audit.shutdown(Duration::from_secs(2)).await);
        self.recorded.entries.lock().clone()
    }
}

fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn brand_mocks() -> Mocks {
    let mut mocks = Mocks::new();
    mocks
        .taxonomies
        .expect_create()
        .times(1)
        .returning(|_, name| Ok(Taxon { id: 9, name: name.to_string() }));
    mocks
}

#[tokio::test]
async fn test_public_route_needs_no_token() {
    let harness = Harness::new(Mocks::new(), HttpSettings::default());

    let (status, body) = harness.send(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(harness.audit_entries().await.is_empty());
}

#[tokio::test]
async fn test_catalog_reads_are_public_but_writes_are_not() {
    let mut mocks = Mocks::new();
    mocks.products.expect_list().times(1).returning(|_| Ok((Vec::new(), 0)));
    let harness = Harness::new(mocks, HttpSettings::default());

    let (status, body) = harness.send(get("/products?page=0&limit=500", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["limit"], 100);

    let (status, _) = harness
        .send(post_json("/products", None, serde_json::json!({"name": "Runner"})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_token_is_rejected_before_any_work() {
    let harness = Harness::new(Mocks::new(), HttpSettings::default());

    let (status, body) = harness.send(get("/users", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = harness.send(get("/users", Some("Bearer not-a-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert!(harness.audit_entries().await.is_empty());
}

#[tokio::test]
async fn test_role_gates() {
    let mut mocks = Mocks::new();
    mocks.reports.expect_list().times(2).returning(|| Ok(Vec::new()));
    let harness = Harness::new(mocks, HttpSettings::default());

    let user = harness.bearer(3, Role::User);
    let manager = harness.bearer(2, Role::Manager);
    let admin = harness.bearer(1, Role::Admin);

    let (status, body) = harness.send(get("/reports", Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _) = harness.send(get("/reports", Some(&manager))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = harness.send(get("/reports", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);

    // Manager and user are siblings: neither passes the other's gate
    let (status, _) = harness.send(get("/basket/2", Some(&manager))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_denied_mutation_leaves_no_audit_trail() {
    let harness = Harness::new(Mocks::new(), HttpSettings::default());
    let user = harness.bearer(3, Role::User);

    let (status, _) = harness
        .send(post_json("/admin/brands", Some(&user), serde_json::json!({"name": "Nike"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(harness.audit_entries().await.is_empty());
}

#[tokio::test]
async fn test_mutation_is_audited_twice() {
    let harness = Harness::new(brand_mocks(), HttpSettings::default());
    let admin = harness.bearer(1, Role::Admin);

    let (status, body) = harness
        .send(post_json("/admin/brands", Some(&admin), serde_json::json!({"name": " Nike "})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Nike");

    let mut entries = harness.audit_entries().await;
    entries.sort_by(|a, b| a.entity.cmp(&b.entity));
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].entity.as_deref(), Some("admin/brands"));
    assert_eq!(entries[0].action, "CREATE");
    assert_eq!(entries[0].details.as_deref(), Some("admin CREATE brands"));
    assert_eq!(entries[0].entity_id, None);

    assert_eq!(entries[1].entity.as_deref(), Some("brand"));
    assert_eq!(entries[1].entity_id, Some(9));
    assert_eq!(entries[1].details.as_deref(), Some("Created brand: Nike"));
    assert!(entries.iter().all(|e| e.user_id == 1));
}

#[tokio::test]
async fn test_transport_audit_can_be_disabled() {
    let settings = HttpSettings { transport_audit: false, ..HttpSettings::default() };
    let harness = Harness::new(brand_mocks(), settings);
    let admin = harness.bearer(1, Role::Admin);

    let (status, _) = harness
        .send(post_json("/brands", Some(&admin), serde_json::json!({"name": "Nike"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let entries = harness.audit_entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity.as_deref(), Some("brand"));
}

#[tokio::test]
async fn test_basket_is_owner_only() {
    let mut mocks = Mocks::new();
    mocks
        .shopping
        .expect_basket_for_user()
        .with(eq(5))
        .times(2)
        .returning(|_| Ok(Vec::new()));
    let harness = Harness::new(mocks, HttpSettings::default());

    let own = harness.bearer(5, Role::User);
    let (status, _) = harness.send(get("/basket/5", Some(&own))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = harness.send(get("/basket/6", Some(&own))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = harness.bearer(1, Role::Admin);
    let (status, _) = harness.send(get("/basket/5", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_report_kind_is_bad_request() {
    let harness = Harness::new(Mocks::new(), HttpSettings::default());
    let manager = harness.bearer(2, Role::Manager);

    let (status, _) = harness.send(get("/reports/weather/pdf", Some(&manager))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = harness.send(get("/reports/sales/docx", Some(&manager))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preflight_passes_without_token() {
    let harness = Harness::new(Mocks::new(), HttpSettings::default());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/admin/users")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let (status, _) = harness.send(request).await;
    assert_ne!(status, StatusCode::UNAUTHORIZED);
}
