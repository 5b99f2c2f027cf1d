//! Support requests forwarded to the store's admin mailbox

use std::sync::Arc;

use serde_json::json;
use shoestore_shared::utils::mask_email;
use shoestore_shared::Clock;
use tracing::{info, warn};

use super::templates::{MailTemplates, SUPPORT_REQUEST};
use crate::domain::SupportMessage;
use crate::error::DomainError;
use crate::gateways::Mailer;

pub struct SupportService {
    mailer: Arc<dyn Mailer>,
    templates: Arc<MailTemplates>,
    clock: Arc<dyn Clock>,
    admin_email: String,
}

impl SupportService {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        templates: Arc<MailTemplates>,
        clock: Arc<dyn Clock>,
        admin_email: impl Into<String>,
    ) -> Self {
        Self { mailer, templates, clock, admin_email: admin_email.into() }
    }

    /// Validates and forwards the message. `Ok(false)` means the mail could not be sent.
    pub async fn submit(&self, request: &SupportMessage) -> Result<bool, DomainError> {
        let message = request.check()?;

        let body = self.templates.render(
            SUPPORT_REQUEST,
            &json!({
                "name": request.name.trim(),
                "email": request.email.trim(),
                "received_at": self.clock.now().format("%d.%m.%Y %H:%M").to_string(),
                "message": message,
            }),
        )?;
        let subject = format!("Support request from {}", request.name.trim());

        let sent = self.mailer.send(&self.admin_email, &subject, &body).await;
        if sent {
            info!("Support request from {} forwarded", mask_email(&request.email));
        } else {
            warn!("Support request from {} could not be sent", mask_email(&request.email));
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateways::MockMailer;
    use shoestore_shared::ManualClock;

    fn service(mailer: MockMailer) -> SupportService {
        SupportService::new(
            Arc::new(mailer),
            Arc::new(MailTemplates::new().unwrap()),
            Arc::new(ManualClock::default()),
            "admin@shoes.test",
        )
    }

    fn request() -> SupportMessage {
        SupportMessage {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            message: "  Where is my order number 42?  ".into(),
        }
    }

    #[tokio::test]
    async fn test_forwards_to_admin() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|to, subject, body| {
                to == "admin@shoes.test"
                    && subject == "Support request from Ann"
                    && body.contains("Message:\nWhere is my order number 42?\n")
            })
            .times(1)
            .returning(|_, _, _| true);

        assert!(service(mailer).submit(&request()).await.unwrap());
    }

    #[tokio::test]
    async fn test_reports_send_failure() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(|_, _, _| false);
        assert!(!service(mailer).submit(&request()).await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_request_is_not_sent() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let mut bad = request();
        bad.message = "short".into();
        assert!(service(mailer).submit(&bad).await.is_err());
    }
}
