//! Input validation for long URLs and custom aliases.

use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Maximum accepted length of a long URL, matching the storage schema.
pub const MAX_URL_LENGTH: usize = 2048;

/// Minimum length of a short code or custom alias.
pub const MIN_CODE_LENGTH: usize = 3;

/// Maximum length of a short code or custom alias, matching the storage schema.
pub const MAX_CODE_LENGTH: usize = 10;

/// Validates a long URL before it is persisted.
///
/// The URL must parse as absolute http(s) and stay within
/// [`MAX_URL_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_long_url(long_url: &str) -> Result<(), AppError> {
    if long_url.is_empty() {
        return Err(AppError::bad_request("longUrl is required", json!({})));
    }

    if long_url.len() > MAX_URL_LENGTH {
        return Err(AppError::bad_request(
            format!("URL must not exceed {} characters", MAX_URL_LENGTH),
            json!({ "provided_length": long_url.len() }),
        ));
    }

    let parsed = Url::parse(long_url).map_err(|e| {
        AppError::bad_request("Must be a valid URL", json!({ "reason": e.to_string() }))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::bad_request(
            "URL scheme must be http or https",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    Ok(())
}

/// Validates a user-provided custom alias.
///
/// # Rules
///
/// - Length: 3-10 characters
/// - Allowed characters: ASCII letters and digits
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < MIN_CODE_LENGTH || alias.len() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom alias must be 3-10 characters",
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters and digits",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
