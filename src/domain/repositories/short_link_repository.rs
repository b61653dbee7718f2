//! Repository trait for short link data access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;

/// Repository interface for the durable short link store.
///
/// The store is the single source of truth and must enforce `short_code`
/// uniqueness at the storage layer; concurrent writers of the same code are
/// serialized by its uniqueness constraint, not by application locking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Returns true if a link with the given short code exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn exists(&self, short_code: &str) -> Result<bool, AppError>;

    /// Inserts a new short link and returns the persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken
    /// (storage-level uniqueness violation) and [`AppError::Internal`] on
    /// other database errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Deactivates every active link whose expiry time has passed at `now`.
    ///
    /// Returns the number of links deactivated; zero is a valid no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
