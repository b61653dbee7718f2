//! API route configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{create_url_handler, url_info_handler};
use crate::state::AppState;

/// URL management routes.
///
/// # Endpoints
///
/// - `POST /urls`               - Create a short URL
/// - `GET  /urls/{short_code}`  - URL info (not redirect, admin/debug lookup)
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_url_handler))
        .route("/urls/{short_code}", get(url_info_handler))
}
