//! ShortLink entity representing a short code to long URL mapping.

use chrono::{DateTime, Utc};

/// A persisted short link.
///
/// The canonical record: `short_code` is globally unique and immutable once
/// created, and `is_active` only ever transitions from `true` to `false`
/// (flipped by the expiry sweep, never back).
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    pub expiry_at: Option<DateTime<Utc>>,
    pub owner_id: Option<i64>,
    pub is_active: bool,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        short_code: String,
        long_url: String,
        created_at: DateTime<Utc>,
        expiry_at: Option<DateTime<Utc>>,
        owner_id: Option<i64>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            short_code,
            long_url,
            created_at,
            expiry_at,
            owner_id,
            is_active,
        }
    }

    /// Returns true if the link's expiry time has passed at `now`.
    ///
    /// Links without an expiry never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_at.is_some_and(|e| now > e)
    }
}

/// Input data for creating a new short link.
///
/// `id`, `created_at` and `is_active` are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShortLink {
    pub short_code: String,
    pub long_url: String,
    pub expiry_at: Option<DateTime<Utc>>,
    pub owner_id: Option<i64>,
}
