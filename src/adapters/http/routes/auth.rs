use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState,
    adapters::http::guard::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    application::app_error::{AppError, AppResult},
    infra::config::AppConfig,
};

#[derive(Deserialize)]
struct LoginPayload {
    email: String,
    password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(get_me))
        .route("/refresh-token", post(refresh_token))
}

async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    let outcome = app_state
        .auth_use_cases
        .login(&payload.email, &payload.password)
        .await?;

    let jar = jar
        .add(token_cookie(
            &app_state.config,
            ACCESS_TOKEN_COOKIE,
            outcome.access_token,
            app_state.config.access_token_ttl,
        ))
        .add(token_cookie(
            &app_state.config,
            REFRESH_TOKEN_COOKIE,
            outcome.refresh_token,
            app_state.config.refresh_token_ttl,
        ));

    Ok((
        jar,
        super::success(
            StatusCode::OK,
            "User logged in successfully!",
            serde_json::json!({ "needPasswordChange": outcome.need_password_change }),
        ),
    ))
}

async fn get_me(
    State(app_state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let token = access_token_from(&jar, &headers).ok_or(AppError::InvalidCredentials)?;
    let profile = app_state.auth_use_cases.get_me(&token).await?;

    Ok(super::success(
        StatusCode::OK,
        "User retrieved successfully",
        profile,
    ))
}

async fn refresh_token(
    State(app_state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let refresh = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(AppError::InvalidCredentials)?;

    let outcome = app_state.auth_use_cases.refresh(&refresh).await?;

    // Only the access cookie is replaced; the refresh token is not rotated.
    let jar = jar.add(token_cookie(
        &app_state.config,
        ACCESS_TOKEN_COOKIE,
        outcome.access_token,
        app_state.config.access_token_ttl,
    ));

    Ok((
        jar,
        super::success(
            StatusCode::OK,
            "Access token refreshed successfully!",
            serde_json::json!({ "needPasswordChange": outcome.need_password_change }),
        ),
    ))
}

fn token_cookie(
    config: &AppConfig,
    name: &'static str,
    value: String,
    max_age: time::Duration,
) -> Cookie<'static> {
    // Cross-site frontend in production needs SameSite=None (which in turn
    // requires Secure); local development keeps Lax over plain http.
    let same_site = if config.production {
        SameSite::None
    } else {
        SameSite::Lax
    };
    Cookie::build((name, value))
        .http_only(true)
        .secure(config.production)
        .same_site(same_site)
        .path("/")
        .max_age(max_age)
        .build()
}

fn access_token_from(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        return Some(cookie.value().to_owned());
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_owned())
}
