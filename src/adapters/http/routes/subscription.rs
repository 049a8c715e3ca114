use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState,
    adapters::http::guard::AuthUser,
    application::app_error::AppResult,
    domain::entities::subscription_plan::PlanType,
    domain::entities::user::UserRole,
};

#[derive(Deserialize)]
struct CreateCheckoutPayload {
    #[serde(rename = "planType")]
    plan_type: PlanType,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/create-checkout", post(create_checkout))
        .route("/my-status", get(my_status))
}

/// Public: the pricing page reads this before any login.
async fn list_plans(State(app_state): State<AppState>) -> impl IntoResponse {
    super::success(
        StatusCode::OK,
        "Subscription plans retrieved successfully",
        app_state.subscription_use_cases.plans(),
    )
}

async fn create_checkout(
    State(app_state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCheckoutPayload>,
) -> AppResult<impl IntoResponse> {
    let session = app_state
        .subscription_use_cases
        .create_checkout(&user.email, user.role, payload.plan_type)
        .await?;

    Ok(super::success(
        StatusCode::OK,
        "Checkout session created successfully",
        session,
    ))
}

async fn my_status(
    State(app_state): State<AppState>,
    user: AuthUser,
) -> AppResult<impl IntoResponse> {
    user.require_role(&[UserRole::Traveler])?;

    let status = app_state
        .subscription_use_cases
        .my_status(&user.email)
        .await?;

    Ok(super::success(
        StatusCode::OK,
        "Subscription status retrieved successfully",
        status,
    ))
}
