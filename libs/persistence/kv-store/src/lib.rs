use deadpool_redis::{Config, CreatePoolError, Pool, Runtime};
pub use deadpool_redis::PoolError;
pub use redis::RedisError;
use tracing::{info, instrument};
use url::Url;

pub mod config;
pub mod key;
pub mod macros;
mod redis_store;
mod store;

pub use key::CacheKey;
pub use redis_store::RedisStore;
pub use store::{KeyValueStore, KvError, KvResult};

#[instrument(skip_all, name = "connect-redis")]
pub async fn connect_redis_db<C>(config: &C) -> Result<Pool, CreatePoolError>
where
    C: config::DbConnectConfig,
{
    let mut url = Url::parse("redis://").expect("static scheme parses");

    let _ = url.set_host(Some(config.host()));
    let _ = url.set_port(config.port().into());
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.extend(&[config.db().to_string()]);
    }

    info!(redis.url = %url, redis.connect = true);

    let cfg = Config {
        url: Some(url.to_string()),
        pool: Some(deadpool_redis::PoolConfig::default()),
        connection: None,
    };

    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
    Ok(pool)
}
