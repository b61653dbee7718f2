//! Handlers for short URL creation and info lookup.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::urls::{CreateUrlRequest, UrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a new short URL.
///
/// # Endpoint
///
/// `POST /api/v1/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "long_url": "https://example.com/some/long/path",
///   "custom_alias": "promo25",                  // optional
///   "expiry_at": "2026-12-31T00:00:00Z"         // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request on validation failure
/// - 409 Conflict when the custom alias is taken
/// - 503 Service Unavailable when code allocation is exhausted
pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_short_link(payload.long_url, payload.custom_alias, payload.expiry_at)
        .await?;

    let short_url = state.link_service.short_url(&link.short_code);

    Ok((
        StatusCode::CREATED,
        Json(UrlResponse::from_link(&link, short_url)),
    ))
}

/// Returns the stored record for a short code.
///
/// # Endpoint
///
/// `GET /api/v1/urls/{short_code}`
///
/// Informational lookup for admin and debugging; reads the store directly
/// and performs no redirect.
///
/// # Errors
///
/// - 404 Not Found when the short code does not exist
pub async fn url_info_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<UrlResponse>, AppError> {
    let link = state.link_service.get_short_link(&short_code).await?;
    let short_url = state.link_service.short_url(&link.short_code);

    Ok(Json(UrlResponse::from_link(&link, short_url)))
}
