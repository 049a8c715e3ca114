use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::adapters::http::app_state::AppState;

pub mod auth;
pub mod subscription;
pub mod user;
pub mod webhook;

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .nest("/api/v1/auth", auth::router())
        .nest("/api/v1/user", user::router())
        .nest("/api/v1/subscription", subscription::router())
        // Mounted at the root, outside /api/v1: the processor posts here and
        // the body must stay raw for signature verification.
        .merge(webhook::router())
}

/// Uniform success envelope mirroring the error envelope shape.
///
/// Returns a concrete body type so handlers can hand in data borrowed from
/// their own locals.
pub(crate) fn success(
    status: StatusCode,
    message: &str,
    data: impl Serialize,
) -> (StatusCode, Json<serde_json::Value>) {
    (
        status,
        Json(serde_json::json!({
            "success": true,
            "message": message,
            "statusCode": status.as_u16(),
            "data": data,
        })),
    )
}
