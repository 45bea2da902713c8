//! Claim handlers

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use core_kernel::{ClaimId, Currency, Money, PatientId, ProviderId};
use domain_claims::NewClaim;

use crate::dto::claims::{
    ClaimDetailResponse, ClaimResponse, CreateClaimRequest, DenialResponse, PaymentResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// Creates a draft claim
pub async fn create_claim(
    State(state): State<AppState>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let currency: Currency = match &request.currency {
        Some(code) => code
            .parse()
            .map_err(|e: core_kernel::MoneyError| ApiError::Validation(e.to_string()))?,
        None => Currency::USD,
    };

    let claim = state
        .lifecycle
        .create_claim(NewClaim {
            patient_id: PatientId::from_uuid(request.patient_id),
            provider_id: ProviderId::from_uuid(request.provider_id),
            diagnosis_codes: request.diagnosis_codes,
            procedure_codes: request.procedure_codes,
            billed_amount: Money::new(request.billed_amount, currency),
            service_date: request.service_date,
        })
        .await?;

    Ok(Json(ClaimResponse::from(&claim)))
}

/// Lists all claims
pub async fn list_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.store.list_claims().await?;
    Ok(Json(claims.iter().map(ClaimResponse::from).collect()))
}

/// Gets a claim with its payments and denials
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimDetailResponse>, ApiError> {
    let claim_id = ClaimId::from_uuid(id);
    let claim = state.store.get_claim(claim_id).await?;
    let payments = state.store.payments_for_claim(claim_id).await?;
    let denials = state.store.denials_for_claim(claim_id).await?;

    Ok(Json(ClaimDetailResponse {
        claim: ClaimResponse::from(&claim),
        payments: payments.iter().map(PaymentResponse::from).collect(),
        denials: denials.iter().map(DenialResponse::from).collect(),
    }))
}

/// Submits a draft claim to the clearinghouse
pub async fn submit_claim(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.lifecycle.submit(ClaimId::from_uuid(id)).await?;
    Ok(Json(ClaimResponse::from(&claim)))
}
