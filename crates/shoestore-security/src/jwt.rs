//! Session token handling

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use shoestore_shared::Clock;

use crate::error::AuthError;
use crate::role::{Identity, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates HS256 session tokens. Expiry is checked against the
/// injected clock with no leeway.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(ttl_hours),
            clock,
        }
    }

    pub fn issue(&self, user_id: i32, role: Role) -> Result<String, AuthError> {
        let now = self.clock.now();
        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Creation(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Invalid(e.to_string()))?;

        if claims.sub != claims.user_id.to_string() {
            return Err(AuthError::Invalid("subject mismatch".into()));
        }
        if self.clock.now().timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(Identity::new(claims.user_id, claims.role))
    }

    /// Validates the raw `Authorization` header value.
    pub fn validate_header(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.map(str::trim).filter(|h| !h.is_empty()).ok_or(AuthError::Missing)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Invalid("expected Bearer scheme".into()))?;
        self.validate(token)
    }
}
