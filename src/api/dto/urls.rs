//! DTOs for the URL creation and info endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::ShortLink;

/// Request to create a short URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Must be a valid URL"))]
    #[validate(length(max = 2048, message = "URL must not exceed 2048 characters"))]
    pub long_url: String,

    /// Optional caller-chosen short code (validated for length and characters).
    #[validate(length(min = 3, max = 10, message = "Custom alias must be 3-10 characters"))]
    pub custom_alias: Option<String>,

    /// Optional expiry timestamp; the link is deactivated once it passes.
    pub expiry_at: Option<DateTime<Utc>>,
}

/// Response describing a short link.
///
/// Shared by creation and info lookup, mirroring the persisted record plus
/// the assembled short URL.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub short_url: String,
    pub short_code: String,
    pub long_url: String,
    pub expiry_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UrlResponse {
    /// Builds the response shape from a persisted link.
    pub fn from_link(link: &ShortLink, short_url: String) -> Self {
        Self {
            short_url,
            short_code: link.short_code.clone(),
            long_url: link.long_url.clone(),
            expiry_at: link.expiry_at,
            created_at: link.created_at,
        }
    }
}
