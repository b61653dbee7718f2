//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// Always recoverable: the cache is a best-effort accelerator, so callers
/// log these and move on rather than failing the surrounding operation.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    Connection(String),

    #[error("cache operation error: {0}")]
    Operation(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for the short URL mapping cache.
///
/// The cache is a denormalized projection of the durable store, populated on
/// write. Its absence or staleness is never an error; implementations must
/// signal backend unavailability as a [`CacheError`], never panic.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Stores a short code to long URL mapping.
    ///
    /// The entry has no TTL; pair with [`CacheService::set_expiry`] when the
    /// link carries an expiry time.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unreachable or rejects the
    /// write.
    async fn set_url(&self, short_code: &str, long_url: &str) -> CacheResult<()>;

    /// Sets the remaining time-to-live on an existing cache entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] when the backend is unreachable or rejects the
    /// command.
    async fn set_expiry(&self, short_code: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by the health endpoint to report cache status.
    async fn health_check(&self) -> bool;
}
