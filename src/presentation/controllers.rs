//! API controllers

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use chrono::Utc;

use crate::application::use_cases::ScanImageUseCase;
use crate::config::Config;
use crate::domain::errors::ScanError;
use crate::presentation::models::{HealthResponse, ScanRequestDto, ScanResponse};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub scan_use_case: Arc<ScanImageUseCase>,
    pub config: Arc<Config>,
}

/// POST /scan - Scan one container image synchronously
#[utoipa::path(
    post,
    path = "/scan",
    request_body = ScanRequestDto,
    responses(
        (status = 200, description = "Scan completed", body = ScanResponse),
        (status = 400, description = "Invalid image reference or payload", body = crate::presentation::models::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::presentation::models::ErrorResponse),
        (status = 502, description = "Image registry unreachable", body = crate::presentation::models::ErrorResponse),
        (status = 504, description = "Scan timed out", body = crate::presentation::models::ErrorResponse),
        (status = 500, description = "Scan failed or internal error", body = crate::presentation::models::ErrorResponse)
    ),
    tag = "scan"
)]
pub async fn scan_image(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequestDto>, JsonRejection>,
) -> Result<Json<ScanResponse>, ScanError> {
    let Json(request) = payload
        .map_err(|rejection| ScanError::InvalidImage(format!("malformed request body: {}", rejection)))?;

    let report = state.scan_use_case.execute(request.into_payload()).await?;
    Ok(Json(ScanResponse::from(report)))
}

/// GET /health - Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}
