//! Root banner and unknown-route handler.

use axum::{http::StatusCode, Json};

use crate::error::ErrorBody;

/// GET /
pub async fn index() -> &'static str {
    "Event Management API is running!"
}

/// Any route not matched by the router.
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Route not found")))
}
