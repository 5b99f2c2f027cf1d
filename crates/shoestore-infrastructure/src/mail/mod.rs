//! SMTP mailer over lettre's tokio transport

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, error, info, warn};

use shoestore_core::error::DomainError;
use shoestore_core::gateways::Mailer;
use shoestore_shared::config::MailSettings;
use shoestore_shared::utils::mask_email;

pub struct LettreMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl LettreMailer {
    /// Builds the transport. An empty SMTP host yields a mailer that reports every send as failed.
    pub fn new(settings: &MailSettings) -> Result<Self, DomainError> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| DomainError::InternalError(format!("Invalid sender address: {}", e)))?;

        if settings.smtp_host.is_empty() {
            warn!("SMTP host not configured, outgoing mail is disabled");
            return Ok(Self { transport: None, from });
        }

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| DomainError::InternalError(format!("SMTP setup failed: {}", e)))?
            .port(settings.smtp_port)
            .timeout(Some(Duration::from_secs(settings.timeout_secs)));

        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        info!("SMTP mailer ready: {}:{}", settings.smtp_host, settings.smtp_port);
        Ok(Self { transport: Some(builder.build()), from })
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, String> {
        let to: Mailbox = to.parse().map_err(|e| format!("invalid recipient: {}", e))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Mailer for LettreMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> bool {
        let Some(transport) = &self.transport else {
            warn!("Mail to {} dropped: SMTP disabled", mask_email(to));
            return false;
        };

        let message = match self.build_message(to, subject, body) {
            Ok(m) => m,
            Err(e) => {
                error!("Failed to build mail to {}: {}", mask_email(to), e);
                return false;
            }
        };

        match transport.send(message).await {
            Ok(_) => {
                debug!("Mail '{}' sent to {}", subject, mask_email(to));
                true
            }
            Err(e) => {
                error!("SMTP delivery to {} failed: {}", mask_email(to), e);
                false
            }
        }
    }
}
