//! Redis-backed cache implementation.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

use super::service::{CacheError, CacheResult, CacheService};

/// Redis cache for short URL mappings.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection
/// reuse. Operation failures surface as [`CacheError`] so the caller decides
/// how to degrade; the service layer treats them as advisory.
pub struct RedisCache {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            key_prefix: "url:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, short_code: &str) -> String {
        format!("{}{}", self.key_prefix, short_code)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        conn.set::<_, _, ()>(&key, long_url)
            .await
            .map_err(|e| CacheError::Operation(format!("SET {} failed: {}", key, e)))?;

        debug!("Cache SET: {} -> {}", short_code, long_url);
        Ok(())
    }

    async fn set_expiry(&self, short_code: &str, ttl_seconds: u64) -> CacheResult<()> {
        let key = self.build_key(short_code);
        let mut conn = self.client.clone();

        conn.expire::<_, ()>(&key, ttl_seconds as i64)
            .await
            .map_err(|e| CacheError::Operation(format!("EXPIRE {} failed: {}", key, e)))?;

        debug!("Cache EXPIRE: {} (TTL: {}s)", short_code, ttl_seconds);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
