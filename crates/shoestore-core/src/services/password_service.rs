//! Password reset (forgotten password) and password change flows.
//!
//! Both flows mail a six-digit code and wait for it to be confirmed.
//! A new code for the same e-mail replaces the previous one.

use std::sync::Arc;

use chrono::Duration;
use serde_json::json;
use shoestore_security::codes::{generate_code, is_well_formed};
use shoestore_security::PasswordService;
use shoestore_shared::utils::mask_email;
use shoestore_shared::Clock;
use tracing::{debug, error, info, warn};

use super::templates::{MailTemplates, CHANGE_CODE, RESET_CODE};
use crate::domain::user::check_password_length;
use crate::domain::{CodeRejection, ResetCode};
use crate::error::DomainError;
use crate::gateways::Mailer;
use crate::repositories::{ResetCodeStore, UserRepository};

type CodeGenerator = Arc<dyn Fn() -> String + Send + Sync>;

pub struct PasswordFlowService {
    users: Arc<dyn UserRepository>,
    codes: Arc<dyn ResetCodeStore>,
    mailer: Arc<dyn Mailer>,
    templates: Arc<MailTemplates>,
    clock: Arc<dyn Clock>,
    code_ttl: Duration,
    generate: CodeGenerator,
}

impl PasswordFlowService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        codes: Arc<dyn ResetCodeStore>,
        mailer: Arc<dyn Mailer>,
        templates: Arc<MailTemplates>,
        clock: Arc<dyn Clock>,
        code_ttl_minutes: i64,
    ) -> Self {
        Self {
            users,
            codes,
            mailer,
            templates,
            clock,
            code_ttl: Duration::minutes(code_ttl_minutes),
            generate: Arc::new(generate_code),
        }
    }

    pub fn with_code_generator(mut self, generate: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.generate = Arc::new(generate);
        self
    }

    /// Issues a reset code for a registered e-mail and mails it.
    pub async fn request_reset(&self, email: &str) -> Result<(), DomainError> {
        if self.users.find_by_email(email).await?.is_none() {
            warn!("Password reset requested for unknown email {}", mask_email(email));
            return Err(DomainError::NotFound("User"));
        }

        let code = (self.generate)();
        self.codes
            .set(ResetCode::issue(email, code.clone(), self.clock.now(), self.code_ttl))
            .await?;

        self.mail_code(email, &code, RESET_CODE, "Password reset - Shoes Store").await?;
        info!("Reset code sent to {}", mask_email(email));
        Ok(())
    }

    /// Applies a new password once the code checks out. The reason a code
    /// is refused is logged but never returned.
    pub async fn confirm_reset(&self, email: &str, code: &str, password: &str) -> Result<(), DomainError> {
        self.verified_code(email, code).await.map_err(|reason| {
            debug!("Reset code refused for {}: {:?}", mask_email(email), reason);
            DomainError::ResetCodeInvalid
        })?;

        check_password_length(password)?;
        let hash = hash(password)?;

        self.claim(email, code).await?;
        if !self.users.update_password_by_email(email, &hash).await? {
            return Err(DomainError::NotFound("User"));
        }

        info!("Password reset for {}", mask_email(email));
        Ok(())
    }

    /// Checks the current password, parks the hash of the new one and mails a code.
    pub async fn request_change(&self, user_id: i32, old_password: &str, new_password: &str) -> Result<(), DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound("User"))?;

        let valid = PasswordService::verify(old_password, &user.password_hash).unwrap_or(false);
        if !valid {
            warn!("Password change refused for user {}: wrong current password", user_id);
            return Err(DomainError::InvalidCredentials);
        }

        check_password_length(new_password)?;
        let pending = hash(new_password)?;

        let code = (self.generate)();
        self.codes
            .set(
                ResetCode::issue(&user.email, code.clone(), self.clock.now(), self.code_ttl)
                    .with_pending_password(pending),
            )
            .await?;

        self.mail_code(&user.email, &code, CHANGE_CODE, "Confirm password change - Shoes Store").await?;
        info!("Password change code sent to user {}", user_id);
        Ok(())
    }

    /// Applies the parked password. Returns the account e-mail.
    pub async fn confirm_change(&self, user_id: i32, code: &str) -> Result<String, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound("User"))?;

        let stored = self.verified_code(&user.email, code).await.map_err(|reason| {
            debug!("Change code refused for user {}: {:?}", user_id, reason);
            DomainError::ResetCodeInvalid
        })?;
        let pending = stored
            .pending_password_hash
            .clone()
            .ok_or(DomainError::ResetCodeInvalid)?;

        self.claim(&user.email, code).await?;
        if !self.users.update_password(user_id, &pending).await? {
            return Err(DomainError::NotFound("User"));
        }

        info!("Password changed for user {}", user_id);
        Ok(user.email)
    }

    async fn verified_code(&self, email: &str, code: &str) -> Result<ResetCode, CodeRejection> {
        if !is_well_formed(code) {
            return Err(CodeRejection::Mismatch);
        }
        let stored = match self.codes.get(email).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return Err(CodeRejection::Unknown),
            Err(e) => {
                error!("Reset code lookup failed: {}", e);
                return Err(CodeRejection::Unknown);
            }
        };
        stored.verify(code, self.clock.now())?;
        Ok(stored)
    }

    /// Consumes the code unless a newer one replaced it since it was verified.
    async fn claim(&self, email: &str, code: &str) -> Result<(), DomainError> {
        if self.codes.mark_used(email, code).await? {
            return Ok(());
        }
        debug!("Code for {} was replaced or used before it was claimed", mask_email(email));
        Err(DomainError::ResetCodeInvalid)
    }

    async fn mail_code(&self, to: &str, code: &str, template: &str, subject: &str) -> Result<(), DomainError> {
        let body = self.templates.render(
            template,
            &json!({ "code": code, "ttl_minutes": self.code_ttl.num_minutes() }),
        )?;
        if !self.mailer.send(to, subject, &body).await {
            return Err(DomainError::MailDeliveryFailed);
        }
        Ok(())
    }
}

fn hash(password: &str) -> Result<String, DomainError> {
    PasswordService::hash(password).map_err(|e| DomainError::PasswordHashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::gateways::MockMailer;
    use crate::repositories::MockUserRepository;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shoestore_shared::ManualClock;
    use std::collections::HashMap;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct MapStore(Mutex<HashMap<String, ResetCode>>, Mutex<Option<ResetCode>>);

    impl MapStore {
        /// Stores `code` right before the next claim, as a concurrent request would
        fn reissue_before_claim(&self, code: ResetCode) {
            *self.1.lock() = Some(code);
        }
    }

    #[async_trait]
    impl ResetCodeStore for MapStore {
        async fn get(&self, email: &str) -> Result<Option<ResetCode>, DomainError> {
            Ok(self.0.lock().get(email).cloned())
        }
        async fn set(&self, code: ResetCode) -> Result<(), DomainError> {
            self.0.lock().insert(code.email.clone(), code);
            Ok(())
        }
        async fn mark_used(&self, email: &str, code: &str) -> Result<bool, DomainError> {
            let mut codes = self.0.lock();
            if let Some(newer) = self.1.lock().take() {
                codes.insert(newer.email.clone(), newer);
            }
            match codes.get_mut(email) {
                Some(stored) if stored.code == code && !stored.used => {
                    stored.used = true;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
        async fn delete(&self, email: &str) -> Result<(), DomainError> {
            self.0.lock().remove(email);
            Ok(())
        }
    }

    fn user() -> User {
        User {
            id: 4,
            full_name: "Ann".into(),
            email: "a@b.com".into(),
            password_hash: PasswordService::hash("old-password").unwrap(),
            role_id: 3,
        }
    }

    fn users() -> MockUserRepository {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok((email == "a@b.com").then(user)));
        repo.expect_find_by_id()
            .returning(|id| Ok((id == 4).then(user)));
        repo.expect_update_password_by_email().returning(|_, _| Ok(true));
        repo.expect_update_password().returning(|_, _| Ok(true));
        repo
    }

    fn mailer(ok: bool) -> MockMailer {
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(move |_, _, _| ok);
        mailer
    }

    struct Fixture {
        service: PasswordFlowService,
        clock: Arc<ManualClock>,
        store: Arc<MapStore>,
    }

    fn fixture(repo: MockUserRepository, mailer: MockMailer, codes: &[&str]) -> Fixture {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(MapStore::default());
        let queue = Mutex::new(codes.iter().map(|c| c.to_string()).collect::<VecDeque<_>>());
        let service = PasswordFlowService::new(
            Arc::new(repo),
            store.clone(),
            Arc::new(mailer),
            Arc::new(MailTemplates::new().unwrap()),
            clock.clone(),
            10,
        )
        .with_code_generator(move || queue.lock().pop_front().unwrap_or_else(|| "999999".into()));
        Fixture { service, clock, store }
    }

    #[tokio::test]
    async fn test_reset_happy_path() {
        let f = fixture(users(), mailer(true), &["123456"]);
        f.service.request_reset("a@b.com").await.unwrap();
        f.service.confirm_reset("a@b.com", "123456", "new-password").await.unwrap();
        assert!(f.store.0.lock()["a@b.com"].used);
    }

    #[tokio::test]
    async fn test_reset_unknown_email() {
        let f = fixture(users(), mailer(true), &["123456"]);
        let err = f.service.request_reset("nobody@b.com").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound("User")));
    }

    #[tokio::test]
    async fn test_mail_failure_surfaces() {
        let f = fixture(users(), mailer(false), &["123456"]);
        let err = f.service.request_reset("a@b.com").await.unwrap_err();
        assert!(matches!(err, DomainError::MailDeliveryFailed));
    }

    #[tokio::test]
    async fn test_second_issue_invalidates_first() {
        let f = fixture(users(), mailer(true), &["111111", "222222"]);
        f.service.request_reset("a@b.com").await.unwrap();
        f.service.request_reset("a@b.com").await.unwrap();

        let err = f.service.confirm_reset("a@b.com", "111111", "new-password").await.unwrap_err();
        assert!(matches!(err, DomainError::ResetCodeInvalid));
        f.service.confirm_reset("a@b.com", "222222", "new-password").await.unwrap();
    }

    #[tokio::test]
    async fn test_code_cannot_be_used_twice() {
        let f = fixture(users(), mailer(true), &["123456"]);
        f.service.request_reset("a@b.com").await.unwrap();
        f.service.confirm_reset("a@b.com", "123456", "new-password").await.unwrap();

        let err = f.service.confirm_reset("a@b.com", "123456", "new-password").await.unwrap_err();
        assert!(matches!(err, DomainError::ResetCodeInvalid));
        assert_eq!(
            f.service.verified_code("a@b.com", "123456").await.unwrap_err(),
            CodeRejection::Used
        );
    }

    #[tokio::test]
    async fn test_expired_code_is_rejected_for_expiry() {
        let f = fixture(users(), mailer(true), &["123456"]);
        f.service.request_reset("a@b.com").await.unwrap();
        f.clock.advance(Duration::minutes(10) + Duration::seconds(1));

        let err = f.service.confirm_reset("a@b.com", "123456", "new-password").await.unwrap_err();
        assert!(matches!(err, DomainError::ResetCodeInvalid));
        assert_eq!(
            f.service.verified_code("a@b.com", "123456").await.unwrap_err(),
            CodeRejection::Expired
        );
    }

    #[tokio::test]
    async fn test_short_password_after_valid_code() {
        let f = fixture(users(), mailer(true), &["123456"]);
        f.service.request_reset("a@b.com").await.unwrap();
        let err = f.service.confirm_reset("a@b.com", "123456", "short").await.unwrap_err();
        assert!(matches!(err, DomainError::PasswordTooShort(8)));
        assert!(!f.store.0.lock()["a@b.com"].used);
    }

    #[tokio::test]
    async fn test_change_flow_stores_hash_not_password() {
        let f = fixture(users(), mailer(true), &["654321"]);
        f.service.request_change(4, "old-password", "brand-new-pass").await.unwrap();

        let pending = f.store.0.lock()["a@b.com"].pending_password_hash.clone().unwrap();
        assert_ne!(pending, "brand-new-pass");
        assert!(PasswordService::verify("brand-new-pass", &pending).unwrap());

        let email = f.service.confirm_change(4, "654321").await.unwrap();
        assert_eq!(email, "a@b.com");
    }

    #[tokio::test]
    async fn test_change_wrong_old_password() {
        let f = fixture(users(), mailer(true), &["654321"]);
        let err = f.service.request_change(4, "not-it", "brand-new-pass").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_reset_code_cannot_confirm_change() {
        let f = fixture(users(), mailer(true), &["123456"]);
        f.service.request_reset("a@b.com").await.unwrap();
        let err = f.service.confirm_change(4, "123456").await.unwrap_err();
        assert!(matches!(err, DomainError::ResetCodeInvalid));
    }

    #[tokio::test]
    async fn test_code_reissued_during_confirm_survives() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok((email == "a@b.com").then(user)));
        repo.expect_update_password_by_email().times(1).returning(|_, _| Ok(true));
        let f = fixture(repo, mailer(true), &["111111"]);

        f.service.request_reset("a@b.com").await.unwrap();
        f.store.reissue_before_claim(ResetCode::issue(
            "a@b.com",
            "222222".into(),
            f.clock.now(),
            Duration::minutes(10),
        ));

        let err = f.service.confirm_reset("a@b.com", "111111", "new-password").await.unwrap_err();
        assert!(matches!(err, DomainError::ResetCodeInvalid));

        let current = f.store.0.lock()["a@b.com"].clone();
        assert_eq!(current.code, "222222");
        assert!(!current.used);

        f.service.confirm_reset("a@b.com", "222222", "new-password").await.unwrap();
        assert!(f.store.0.lock()["a@b.com"].used);
    }
}
