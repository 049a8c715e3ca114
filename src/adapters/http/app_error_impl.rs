use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::app_error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        match self {
            AppError::InvalidCredentials => {
                error_resp(StatusCode::UNAUTHORIZED, "Invalid credentials")
            }
            // Token-service detail never reaches the client.
            AppError::ExpiredToken | AppError::InvalidToken | AppError::MalformedToken => {
                error_resp(StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            AppError::Forbidden => error_resp(StatusCode::FORBIDDEN, "Forbidden"),
            AppError::InvalidInput(msg) => error_resp(StatusCode::BAD_REQUEST, &msg),
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, "Not found"),
            AppError::Database(_) | AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
            ),
        }
    }
}

fn error_resp(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "success": false,
        "message": message,
        "statusCode": status.as_u16(),
    });
    (status, Json(body)).into_response()
}
