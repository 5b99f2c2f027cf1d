use std::sync::Arc;

use async_trait::async_trait;
use deadpool_redis::redis::{AsyncCommands, Script};
use deadpool_redis::{Config, Pool, Runtime};
use tracing::{error, info};

use shoestore_core::domain::ResetCode;
use shoestore_core::error::DomainError;
use shoestore_core::repositories::ResetCodeStore;
use shoestore_shared::Clock;

const KEY_PREFIX: &str = "reset_code:";

/// Flags the entry used if it still holds ARGV[1], keeping the key's expiry
const MARK_USED_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then return 0 end
local entry = cjson.decode(raw)
if entry.code ~= ARGV[1] or entry.used then return 0 end
entry.used = true
local ttl = redis.call('PTTL', KEYS[1])
if ttl > 0 then
  redis.call('SET', KEYS[1], cjson.encode(entry), 'PX', ttl)
else
  redis.call('SET', KEYS[1], cjson.encode(entry))
end
return 1
"#;

/// Codes shared across instances. Redis expires each key together with its code.
pub struct RedisResetCodeStore {
    pool: Pool,
    clock: Arc<dyn Clock>,
}

impl RedisResetCodeStore {
    pub fn connect(url: &str, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::CacheError(e.to_string()))?;

        info!("Reset codes stored in Redis");
        Ok(Self { pool, clock })
    }

    fn key(email: &str) -> String {
        format!("{}{}", KEY_PREFIX, email)
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, DomainError> {
        self.pool.get().await.map_err(|e| {
            error!("Redis pool error: {}", e);
            DomainError::CacheError(e.to_string())
        })
    }
}

fn cache_error(e: impl std::fmt::Display) -> DomainError {
    error!("Redis command failed: {}", e);
    DomainError::CacheError(e.to_string())
}

#[async_trait]
impl ResetCodeStore for RedisResetCodeStore {
    async fn get(&self, email: &str) -> Result<Option<ResetCode>, DomainError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(Self::key(email)).await.map_err(cache_error)?;

        raw.map(|json| serde_json::from_str(&json).map_err(cache_error))
            .transpose()
    }

    async fn set(&self, code: ResetCode) -> Result<(), DomainError> {
        let ttl = code.remaining(self.clock.now()).num_seconds().max(1) as u64;
        let json = serde_json::to_string(&code).map_err(cache_error)?;

        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(Self::key(&code.email), json, ttl)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    async fn mark_used(&self, email: &str, code: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection().await?;
        let marked: i32 = Script::new(MARK_USED_SCRIPT)
            .key(Self::key(email))
            .arg(code)
            .invoke_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(marked == 1)
    }

    async fn delete(&self, email: &str) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(Self::key(email)).await.map_err(cache_error)?;
        Ok(())
    }
}
