//! Mail transport port

use async_trait::async_trait;

/// Sends a plain-text message. Failures are reported as `false`, never raised.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> bool;
}
