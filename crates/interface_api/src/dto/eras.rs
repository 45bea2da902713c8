//! Remittance advice DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain_claims::RemittanceAdvice;

#[derive(Debug, Deserialize)]
pub struct IngestEraRequest {
    /// Raw X12 835 payload
    pub raw_edi: String,
    pub payer_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct EraResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
    pub received_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<&RemittanceAdvice> for EraResponse {
    fn from(era: &RemittanceAdvice) -> Self {
        Self {
            id: *era.id.as_uuid(),
            payer_id: era.payer_id.map(|p| *p.as_uuid()),
            claim_number: era.claim_number.clone(),
            check_number: era.check_number.clone(),
            check_amount: era.check_amount.map(|a| a.amount()),
            payment_date: era.payment_date,
            status: era.status.to_string(),
            error_reason: era.error_reason.clone(),
            received_at: era.received_at,
            processed_at: era.processed_at,
        }
    }
}
