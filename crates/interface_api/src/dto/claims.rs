//! Claim DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::{Claim, Denial, Payment};

#[derive(Debug, Deserialize)]
pub struct CreateClaimRequest {
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub diagnosis_codes: Vec<String>,
    pub procedure_codes: Vec<String>,
    pub billed_amount: Decimal,
    /// ISO 4217 code; USD when omitted
    pub currency: Option<String>,
    pub service_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub id: Uuid,
    pub claim_number: String,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub diagnosis_codes: Vec<String>,
    pub procedure_codes: Vec<String>,
    pub billed_amount: Decimal,
    pub currency: String,
    pub service_date: NaiveDate,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denied_at: Option<DateTime<Utc>>,
}

impl From<&Claim> for ClaimResponse {
    fn from(claim: &Claim) -> Self {
        Self {
            id: *claim.id.as_uuid(),
            claim_number: claim.claim_number.clone(),
            patient_id: *claim.patient_id.as_uuid(),
            provider_id: *claim.provider_id.as_uuid(),
            diagnosis_codes: claim.diagnosis_codes.clone(),
            procedure_codes: claim.procedure_codes.clone(),
            billed_amount: claim.billed_amount.amount(),
            currency: claim.billed_amount.currency().code().to_string(),
            service_date: claim.service_date,
            status: claim.status.to_string(),
            reject_reason: claim.reject_reason.clone(),
            created_at: claim.created_at,
            submitted_at: claim.submitted_at,
            accepted_at: claim.accepted_at,
            rejected_at: claim.rejected_at,
            paid_at: claim.paid_at,
            denied_at: claim.denied_at,
        }
    }
}

/// Claim with its linked payments and denials
#[derive(Debug, Serialize)]
pub struct ClaimDetailResponse {
    #[serde(flatten)]
    pub claim: ClaimResponse,
    pub payments: Vec<PaymentResponse>,
    pub denials: Vec<DenialResponse>,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era_id: Option<Uuid>,
    pub check_number: String,
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: NaiveDate,
    pub status: String,
    pub posted_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            era_id: payment.era_id.map(|e| *e.as_uuid()),
            check_number: payment.check_number.clone(),
            amount: payment.amount.amount(),
            currency: payment.amount.currency().code().to_string(),
            payment_date: payment.payment_date,
            status: payment.status.to_string(),
            posted_at: payment.posted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DenialResponse {
    pub id: Uuid,
    pub code: String,
    pub reason: String,
    pub category: String,
    pub appeal_eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appeal_deadline: Option<NaiveDate>,
    pub denied_on: NaiveDate,
}

impl From<&Denial> for DenialResponse {
    fn from(denial: &Denial) -> Self {
        Self {
            id: *denial.id.as_uuid(),
            code: denial.code.clone(),
            reason: denial.reason.clone(),
            category: denial.category.to_string(),
            appeal_eligible: denial.appeal_eligible,
            appeal_deadline: denial.appeal_deadline,
            denied_on: denial.denied_on,
        }
    }
}
