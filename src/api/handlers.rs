// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Endpoint handlers for the try-on boundary

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::errors::ApiErrorResponse;
use super::http_server::AppState;
use crate::codec::ImagePayload;
use crate::errors::GenerationError;
use crate::orchestrator::{GenerationRequest, GenerationSource};

/// POST /api/virtual-try-on request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnRequest {
    #[serde(default)]
    pub model_image: Option<String>,
    #[serde(default)]
    pub cloth_image: Option<String>,
}

/// POST /api/virtual-try-on success body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnResponse {
    pub success: bool,
    pub result_image: String,
}

/// GET /api/health body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// POST /api/virtual-try-on - compose the garment onto the model image
pub async fn try_on_handler(
    State(state): State<AppState>,
    Json(request): Json<TryOnRequest>,
) -> Result<Json<TryOnResponse>, ApiErrorResponse> {
    debug!("Received virtual try-on request");

    let model = decode_field(request.model_image.as_deref())?;
    let cloth = decode_field(request.cloth_image.as_deref())?;

    let outcome = state
        .orchestrator
        .orchestrate(&GenerationRequest::new(model, cloth))
        .await?;

    info!("Try-on request served from {:?}", outcome.source);
    if outcome.source == GenerationSource::Placeholder {
        debug!("Result is the synthetic placeholder image");
    }

    Ok(Json(TryOnResponse {
        success: true,
        result_image: outcome.image.to_embedded(),
    }))
}

/// GET /api/health - liveness, unconditional
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Absent or blank fields are rejected before any decoding is attempted
fn decode_field(field: Option<&str>) -> Result<ImagePayload, GenerationError> {
    match field {
        Some(embedded) if !embedded.trim().is_empty() => ImagePayload::from_embedded(embedded),
        _ => Err(GenerationError::MissingInput),
    }
}
