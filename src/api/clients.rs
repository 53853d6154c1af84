use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::{ApiError, AppState, authenticate_request};
use crate::services::progressive_overload::AnalysisRequest;
use crate::services::report;

pub async fn analyze(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<AnalysisRequest>,
) -> Result<Response, ApiError> {
    if let Err(status) = authenticate_request(&headers, &state.config.api_token) {
        return Ok(status.into_response());
    }

    tracing::info!(
        %client_id,
        strategy = %request.strategy,
        records = request.performances.len(),
        "analysis.requested"
    );

    let response = state
        .progression_service
        .process_request(&client_id, request)
        .await?;

    Ok((StatusCode::OK, Json(response)).into_response())
}

pub async fn latest_progressions(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Err(status) = authenticate_request(&headers, &state.config.api_token) {
        return Ok(status.into_response());
    }

    let entry = state
        .progression_service
        .history()
        .latest(&client_id)
        .await?;

    Ok(Json(json!({ "client_id": client_id, "entry": entry })).into_response())
}

pub async fn latest_report(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Err(status) = authenticate_request(&headers, &state.config.api_token) {
        return Ok(status.into_response());
    }

    let entry = state
        .progression_service
        .history()
        .latest(&client_id)
        .await?;

    Ok(report::render(&client_id, &entry.decisions()).into_response())
}
