use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::Pool;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::debug;

use crate::store::{KeyValueStore, KvResult};

/// Redis-backed [`KeyValueStore`] over a deadpool connection pool.
///
/// Values are stored as JSON strings; per-key expiry is delegated to
/// Redis via `SETEX`.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self { Self { pool } }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> KvResult<Option<Value>> {
        let mut conn = self.pool.get().await?;
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_with_ttl(
        &self, key: &str, value: &Value, ttl: Duration,
    ) -> KvResult<()> {
        let raw = serde_json::to_string(value)?;
        let mut conn = self.pool.get().await?;
        let _: () = conn.set_ex(key, raw, ttl.as_secs()).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> KvResult<bool> {
        let mut conn = self.pool.get().await?;
        let count: u32 = conn.del(key).await?;
        Ok(count > 0)
    }

    async fn keys(&self, pattern: &str) -> KvResult<Vec<String>> {
        let mut conn = self.pool.get().await?;
        let keys: Vec<String> = conn.keys(pattern).await?;
        debug!("Found {} keys for pattern {pattern}", keys.len());
        Ok(keys)
    }
}
