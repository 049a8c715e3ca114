use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::Deserialize;

use crate::{adapters::http::app_state::AppState, application::app_error::AppResult};

#[derive(Deserialize)]
struct RegisterPayload {
    email: String,
    password: String,
    name: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    let registered = app_state
        .auth_use_cases
        .register_traveler(&payload.email, &payload.password, &payload.name)
        .await?;

    Ok(super::success(
        StatusCode::CREATED,
        "Traveler registered successfully",
        registered,
    ))
}
