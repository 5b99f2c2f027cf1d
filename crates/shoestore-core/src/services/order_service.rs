//! Orders and the delayed order-confirmation mail

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use shoestore_shared::utils::mask_email;
use shoestore_shared::Clock;
use tracing::{debug, error, info, warn};

use super::templates::{MailTemplates, ORDER_CONFIRMATION};
use crate::domain::{NewAuditEntry, Order, OrderProduct};
use crate::error::DomainError;
use crate::gateways::Mailer;
use crate::repositories::{AuditRepository, OrderRepository};

pub const EMAIL_SENT: &str = "EMAIL_SENT";

pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    audit_repo: Arc<dyn AuditRepository>,
    mailer: Arc<dyn Mailer>,
    templates: Arc<MailTemplates>,
    clock: Arc<dyn Clock>,
    mail_delay: Duration,
    /// Orders with a confirmation scheduled or in flight
    scheduled: Mutex<HashSet<i32>>,
}

#[derive(Serialize)]
struct MailLine {
    number: usize,
    product_name: String,
    size: i32,
    price: String,
    quantity: i32,
    total: String,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        audit_repo: Arc<dyn AuditRepository>,
        mailer: Arc<dyn Mailer>,
        templates: Arc<MailTemplates>,
        clock: Arc<dyn Clock>,
        mail_delay: Duration,
    ) -> Self {
        Self {
            orders,
            audit_repo,
            mailer,
            templates,
            clock,
            mail_delay,
            scheduled: Mutex::new(HashSet::new()),
        }
    }

    pub async fn create(&self, user_id: i32, order_date: Option<DateTime<Utc>>) -> Result<Order, DomainError> {
        let date = order_date.unwrap_or_else(|| self.clock.now());
        let order = self.orders.create(user_id, date).await?;
        info!("Order {} created for user {}", order.id, user_id);
        Ok(order)
    }

    /// Adds a line and schedules the confirmation mail. At most one mail is
    /// scheduled per order; lines added within the delay end up in it and later
    /// lines do not trigger another one.
    pub async fn add_line(
        self: &Arc<Self>,
        order_id: i32,
        product_size_id: i32,
        quantity: i32,
    ) -> Result<OrderProduct, DomainError> {
        if quantity < 1 {
            return Err(DomainError::ValidationError("Quantity must be at least 1".into()));
        }
        if self.orders.find(order_id).await?.is_none() {
            return Err(DomainError::NotFound("Order"));
        }

        let line = self.orders.add_line(order_id, product_size_id, quantity).await?;

        if self.audit_repo.exists(EMAIL_SENT, "order", order_id).await? {
            debug!("Order {} confirmation already sent", order_id);
            return Ok(line);
        }
        if !self.scheduled.lock().insert(order_id) {
            debug!("Order {} confirmation already scheduled", order_id);
            return Ok(line);
        }

        let service = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(service.mail_delay).await;
            if let Err(e) = service.send_confirmation(order_id).await {
                error!("Order {} confirmation failed: {}", order_id, e);
            }
            service.scheduled.lock().remove(&order_id);
        });

        Ok(line)
    }

    /// Sends the confirmation once per order. Returns whether a mail went out.
    pub async fn send_confirmation(&self, order_id: i32) -> Result<bool, DomainError> {
        if self.audit_repo.exists(EMAIL_SENT, "order", order_id).await? {
            debug!("Order {} confirmation already sent", order_id);
            return Ok(false);
        }
        if self.orders.count_lines(order_id).await? == 0 {
            debug!("Order {} has no lines yet", order_id);
            return Ok(false);
        }

        let order = self.orders.find(order_id).await?.ok_or(DomainError::NotFound("Order"))?;
        let Some(recipient) = self.orders.recipient_email(order_id).await? else {
            warn!("Order {} has no recipient address", order_id);
            return Ok(false);
        };

        let lines = self.orders.lines_for_order(order_id).await?;
        let total: f64 = lines.iter().map(|l| l.total()).sum();
        let mail_lines: Vec<MailLine> = lines
            .iter()
            .enumerate()
            .map(|(i, l)| MailLine {
                number: i + 1,
                product_name: l.product_name.clone(),
                size: l.size,
                price: format!("{:.2}", l.price),
                quantity: l.quantity,
                total: format!("{:.2}", l.total()),
            })
            .collect();

        let body = self.templates.render(
            ORDER_CONFIRMATION,
            &json!({
                "order_id": order_id,
                "order_date": order.order_date.format("%d.%m.%Y %H:%M").to_string(),
                "lines": mail_lines,
                "total": format!("{:.2}", total),
            }),
        )?;
        let subject = format!("Order #{} accepted - Shoes Store", order_id);

        if !self.mailer.send(&recipient, &subject, &body).await {
            return Err(DomainError::MailDeliveryFailed);
        }

        // Written straight to the store: later lines check it before scheduling
        let sent = NewAuditEntry {
            user_id: order.user_id,
            action: EMAIL_SENT.into(),
            entity: Some("order".into()),
            entity_id: Some(order_id),
            details: Some(format!("Order confirmation sent to {}", mask_email(&recipient))),
            created_at: self.clock.now(),
        };
        if let Err(e) = self.audit_repo.insert_batch(&[sent]).await {
            error!("Order {} confirmation sent but not recorded: {}", order_id, e);
        }
        info!("Order {} confirmation sent to {}", order_id, mask_email(&recipient));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::logger::tests::RecordingAuditRepository;
    use crate::domain::OrderLine;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::gateways::MockMailer;
    use crate::repositories::MockOrderRepository;
    use chrono::TimeZone;
    use shoestore_shared::ManualClock;

    fn order_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
    }

    fn orders(line_count: i64) -> MockOrderRepository {
        let mut repo = MockOrderRepository::new();
        repo.expect_count_lines().returning(move |_| Ok(line_count));
        repo.expect_find()
            .returning(|id| Ok(Some(Order { id, user_id: 2, order_date: order_date() })));
        repo.expect_recipient_email().returning(|_| Ok(Some("buyer@example.com".into())));
        repo.expect_lines_for_order().returning(|order_id| {
            Ok(vec![OrderLine {
                id: 1,
                order_id,
                product_size_id: 3,
                product_id: 4,
                product_name: "Runner".into(),
                size: 42,
                quantity: 2,
                price: 50.0,
                image_url: String::new(),
            }])
        });
        repo
    }

    fn service(repo: MockOrderRepository, mailer: MockMailer, audit_repo: Arc<RecordingAuditRepository>) -> OrderService {
        service_with_delay(repo, mailer, audit_repo, Duration::from_millis(0))
    }

    fn service_with_delay(
        repo: MockOrderRepository,
        mailer: MockMailer,
        audit_repo: Arc<RecordingAuditRepository>,
        delay: Duration,
    ) -> OrderService {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(order_date()));
        OrderService::new(
            Arc::new(repo),
            audit_repo,
            Arc::new(mailer),
            Arc::new(MailTemplates::new().unwrap()),
            clock,
            delay,
        )
    }

    #[tokio::test]
    async fn test_confirmation_sent_and_recorded() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|to, subject, body| {
                to == "buyer@example.com"
                    && subject.contains("#7")
                    && body.contains("Runner")
                    && body.contains("TOTAL: 100.00")
                    && body.contains("01.06.2024 09:30")
            })
            .times(1)
            .returning(|_, _, _| true);

        let audit_repo = Arc::new(RecordingAuditRepository::default());
        let service = service(orders(1), mailer, audit_repo.clone());

        assert!(service.send_confirmation(7).await.unwrap());

        let entries: Vec<NewAuditEntry> = audit_repo.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, EMAIL_SENT);
        assert_eq!(entries[0].entity_id, Some(7));
    }

    #[tokio::test]
    async fn test_confirmation_not_repeated() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let audit_repo = Arc::new(RecordingAuditRepository::default());
        audit_repo.entries.lock().push(NewAuditEntry {
            user_id: 2,
            action: EMAIL_SENT.into(),
            entity: Some("order".into()),
            entity_id: Some(7),
            details: None,
            created_at: order_date(),
        });
        let service = service(orders(1), mailer, audit_repo);

        assert!(!service.send_confirmation(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_order_is_not_mailed() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let service = service(orders(0), mailer, Arc::new(RecordingAuditRepository::default()));
        assert!(!service.send_confirmation(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_line_rejects_zero_quantity() {
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();
        let service = Arc::new(service(orders(0), mailer, Arc::new(RecordingAuditRepository::default())));
        let err = service.add_line(7, 3, 0).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_several_lines_send_one_confirmation() {
        let sent = Arc::new(AtomicUsize::new(0));
        let counter = sent.clone();
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        let mut repo = orders(3);
        repo.expect_add_line().returning(|order_id, product_size_id, quantity| {
            Ok(OrderProduct { id: product_size_id, order_id, product_size_id, quantity })
        });

        let audit_repo = Arc::new(RecordingAuditRepository::default());
        let service = Arc::new(service_with_delay(repo, mailer, audit_repo.clone(), Duration::from_millis(50)));

        for size in 1..=3 {
            service.add_line(7, size, 1).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(sent.load(Ordering::SeqCst), 1);
        assert_eq!(audit_repo.entries().iter().filter(|e| e.action == EMAIL_SENT).count(), 1);

        // A line added after the mail went out does not schedule another one
        service.add_line(7, 4, 1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }
}
