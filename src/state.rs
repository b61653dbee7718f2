//! Shared application state injected into HTTP handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::infrastructure::cache::CacheService;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub cache: Arc<dyn CacheService>,
    pub db: PgPool,
}

impl AppState {
    /// Creates the shared state.
    pub fn new(link_service: Arc<LinkService>, cache: Arc<dyn CacheService>, db: PgPool) -> Self {
        Self {
            link_service,
            cache,
            db,
        }
    }
}
