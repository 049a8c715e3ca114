use axum::{
    extract::State, http::HeaderMap, http::StatusCode, response::IntoResponse, routing::post,
    Router,
};

use crate::{adapters::http::app_state::AppState, application::app_error::AppResult};

const SIGNATURE_HEADER: &str = "stripe-signature";

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(handle_webhook))
}

/// Processor callback. The body is taken as a raw `String` because the
/// signature covers the exact bytes sent; re-serializing parsed JSON would
/// break verification.
async fn handle_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<impl IntoResponse> {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    app_state.webhook_use_cases.handle(&body, signature).await?;

    Ok(StatusCode::OK)
}
