use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Store-level error, shared by every [`KeyValueStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Other(String),
}

pub type KvResult<T> = Result<T, KvError>;

/// Key-value port over opaque string keys and JSON values.
///
/// The store's own TTL expiry is the only eviction mechanism exposed
/// through this port; callers that need anything evicted earlier delete
/// keys explicitly.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a value; `None` covers both absent and expired keys.
    async fn get(&self, key: &str) -> KvResult<Option<Value>>;

    /// Store a value under `key` with an expiry.
    async fn set_with_ttl(
        &self, key: &str, value: &Value, ttl: Duration,
    ) -> KvResult<()>;

    /// Remove a key, reporting whether it existed.
    async fn delete(&self, key: &str) -> KvResult<bool>;

    /// All keys matching a glob-style pattern, e.g. `slots:22:*`.
    async fn keys(&self, pattern: &str) -> KvResult<Vec<String>>;
}
