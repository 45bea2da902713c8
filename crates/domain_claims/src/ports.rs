//! Persistence port for the billing pipeline
//!
//! The domain depends on this trait; adapters live in `infra_store`.

use async_trait::async_trait;
use thiserror::Error;

use core_kernel::{ClaimId, EraId, PaymentId};

use crate::claim::Claim;
use crate::denial::Denial;
use crate::era::RemittanceAdvice;
use crate::payment::Payment;

/// Errors surfaced by store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Data error: {0}")]
    Data(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Connection failures may succeed on retry; the rest will not
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}

/// Persistence operations the billing services need
///
/// Updates replace the stored record wholesale; optimistic concurrency is
/// unnecessary because all claim mutations run under the per-claim lock.
#[async_trait]
pub trait ClaimsStore: Send + Sync {
    async fn insert_claim(&self, claim: &Claim) -> Result<(), StoreError>;
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, StoreError>;
    async fn find_claim_by_number(
        &self,
        claim_number: &str,
    ) -> Result<Option<Claim>, StoreError>;
    async fn update_claim(&self, claim: &Claim) -> Result<(), StoreError>;
    async fn list_claims(&self) -> Result<Vec<Claim>, StoreError>;

    async fn insert_era(&self, era: &RemittanceAdvice) -> Result<(), StoreError>;
    async fn get_era(&self, id: EraId) -> Result<RemittanceAdvice, StoreError>;
    async fn update_era(&self, era: &RemittanceAdvice) -> Result<(), StoreError>;

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError>;
    async fn get_payment(&self, id: PaymentId) -> Result<Payment, StoreError>;
    async fn update_payment(&self, payment: &Payment) -> Result<(), StoreError>;
    /// Finds the non-voided payment for a (claim, era) pair, if any
    async fn find_payment(
        &self,
        claim_id: ClaimId,
        era_id: Option<EraId>,
    ) -> Result<Option<Payment>, StoreError>;
    async fn payments_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Payment>, StoreError>;

    async fn insert_denial(&self, denial: &Denial) -> Result<(), StoreError>;
    async fn denials_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Denial>, StoreError>;
}
