use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use planbot::components::sentiment::{SentimentRequest, SentimentResponse};
use planbot::error::Error;
use serde_json::json;
use tracing::{error, warn};

use crate::AppState;

/// Error returned to HTTP clients as `{"detail": ...}`
pub enum ApiError {
    /// Body could not be read as a sentiment request
    Body(JsonRejection),
    Service(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Body(rejection) => {
                warn!("Rejected malformed body: {}", rejection.body_text());
                (rejection.status(), rejection.body_text())
            }
            ApiError::Service(Error::UnsupportedLanguage(code)) => {
                warn!("Rejected request for unsupported language {}", code);
                (StatusCode::BAD_REQUEST, "Unsupported language".to_string())
            }
            ApiError::Service(other) => {
                error!("Inference failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Handler for sentiment inference
pub async fn infer_handler(
    State(state): State<AppState>,
    body: Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<SentimentResponse>, ApiError> {
    let Json(body) = body?;
    let response = state.service.infer(&body).await?;
    Ok(Json(response))
}

// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}
