//! Remittance advice handlers

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use core_kernel::{EraId, PayerId};

use crate::dto::eras::{EraResponse, IngestEraRequest};
use crate::error::ApiError;
use crate::AppState;

/// Ingests a raw 835 payload
pub async fn ingest_era(
    State(state): State<AppState>,
    Json(request): Json<IngestEraRequest>,
) -> Result<Json<EraResponse>, ApiError> {
    if request.raw_edi.trim().is_empty() {
        return Err(ApiError::Validation("raw_edi must not be empty".to_string()));
    }

    let era = state
        .processor
        .ingest(&request.raw_edi, request.payer_id.map(PayerId::from_uuid))
        .await?;
    Ok(Json(EraResponse::from(&era)))
}

/// Gets an ERA by id
pub async fn get_era(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EraResponse>, ApiError> {
    let era = state.store.get_era(EraId::from_uuid(id)).await?;
    Ok(Json(EraResponse::from(&era)))
}

/// Processes a received ERA to its terminal status
pub async fn process_era(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EraResponse>, ApiError> {
    let era = state.processor.process(EraId::from_uuid(id)).await?;
    Ok(Json(EraResponse::from(&era)))
}
