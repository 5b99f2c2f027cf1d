//! One-time confirmation code for password reset and change

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetCode {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    /// Hash of the new password for the change flow
    pub pending_password_hash: Option<String>,
}

/// Why a code was refused. Never shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRejection {
    Unknown,
    Mismatch,
    Used,
    Expired,
}

impl ResetCode {
    pub fn issue(email: &str, code: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            email: email.to_string(),
            code,
            expires_at: now + ttl,
            used: false,
            pending_password_hash: None,
        }
    }

    pub fn with_pending_password(mut self, hash: String) -> Self {
        self.pending_password_hash = Some(hash);
        self
    }

    /// Expiry is a hard boundary: a code is dead once `now` passes `expires_at`.
    pub fn verify(&self, code: &str, now: DateTime<Utc>) -> Result<(), CodeRejection> {
        if self.code != code {
            return Err(CodeRejection::Mismatch);
        }
        if self.used {
            return Err(CodeRejection::Used);
        }
        if now > self.expires_at {
            return Err(CodeRejection::Expired);
        }
        Ok(())
    }

    /// Time left before expiry, zero when already expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_at(now: DateTime<Utc>) -> ResetCode {
        ResetCode::issue("a@b.com", "123456".into(), now, Duration::minutes(10))
    }

    #[test]
    fn test_verify_reasons() {
        let now = Utc::now();
        let code = code_at(now);

        assert_eq!(code.verify("123456", now), Ok(()));
        assert_eq!(code.verify("654321", now), Err(CodeRejection::Mismatch));
        assert_eq!(
            code.verify("123456", now + Duration::minutes(10) + Duration::seconds(1)),
            Err(CodeRejection::Expired)
        );

        let mut used = code.clone();
        used.used = true;
        assert_eq!(used.verify("123456", now), Err(CodeRejection::Used));
    }

    #[test]
    fn test_boundary_is_still_valid() {
        let now = Utc::now();
        let code = code_at(now);
        assert_eq!(code.verify("123456", now + Duration::minutes(10)), Ok(()));
    }

    #[test]
    fn test_remaining_never_negative() {
        let now = Utc::now();
        let code = code_at(now);
        assert_eq!(code.remaining(now + Duration::hours(1)), Duration::zero());
        assert_eq!(code.remaining(now), Duration::minutes(10));
    }
}
