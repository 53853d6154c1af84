pub mod clients;
pub mod webhooks;

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::clients::hevy::HevyClient;
use crate::config::Config;
use crate::error::EngineError;
use crate::services::progressive_overload::ProgressionService;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub progression_service: ProgressionService,
    pub hevy_client: Option<HevyClient>,
    pub processed_workout_ids: Arc<Mutex<HashSet<String>>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "progressive overload engine" }))
        .route("/clients/{client_id}/analyze", post(clients::analyze))
        .route(
            "/clients/{client_id}/progressions/latest",
            get(clients::latest_progressions),
        )
        .route("/clients/{client_id}/report", get(clients::latest_report))
        .route("/webhook", post(webhooks::handle_workout_completion))
        .with_state(state)
}

pub(crate) fn authenticate_request(headers: &HeaderMap, expected: &str) -> Result<(), StatusCode> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token != expected {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(())
}

pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::MalformedRecord(_) | EngineError::InsufficientData(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            EngineError::Io(_) | EngineError::Serialization(_) => {
                tracing::error!(error = %self.0, "api.internal_error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
