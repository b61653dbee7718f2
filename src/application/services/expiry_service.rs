//! Periodic deactivation of expired short links.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::domain::clock::Clock;
use crate::domain::repositories::ShortLinkRepository;
use crate::error::AppError;

/// Service that sweeps expired links in the durable store.
///
/// Each sweep is a single bulk update: every active link whose expiry time
/// has passed is flipped to inactive. The sweep never touches the cache;
/// cached entries carry their own TTL set at creation time, so the two
/// expiry mechanisms converge independently.
pub struct ExpiryService {
    repository: Arc<dyn ShortLinkRepository>,
    clock: Arc<dyn Clock>,
}

impl ExpiryService {
    /// Creates a new expiry service.
    pub fn new(repository: Arc<dyn ShortLinkRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Runs one sweep and returns the number of links deactivated.
    ///
    /// Zero qualifying links is a silent no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn run_sweep(&self) -> Result<u64, AppError> {
        let now = self.clock.now();
        let count = self.repository.deactivate_expired(now).await?;

        if count > 0 {
            info!(count, "deactivated expired short links");
        }

        Ok(count)
    }
}

/// Drives [`ExpiryService::run_sweep`] on a fixed period, forever.
///
/// Sweep failures are logged and the loop continues; a transiently
/// unreachable database must not kill the worker.
pub async fn run_expiry_worker(service: Arc<ExpiryService>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(e) = service.run_sweep().await {
            error!(error = %e, "expiry sweep failed");
        }
    }
}
