//! Claim creation and submission orchestration

use std::sync::Arc;
use std::time::Duration;

use core_kernel::ClaimId;
use edi_codec::encode_837;

use crate::claim::{Claim, ClaimStatus, NewClaim};
use crate::error::BillingError;
use crate::gateway::{ClearinghouseGateway, SubmissionOutcome};
use crate::locks::ClaimLocks;
use crate::ports::ClaimsStore;

const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

/// Drives claims from draft through clearinghouse acknowledgment
///
/// All submission work for one claim runs under that claim's lock, shared
/// with the remittance processor, so concurrent submits and a submit racing
/// an ERA serialize instead of interleaving.
#[derive(Clone)]
pub struct ClaimLifecycle {
    store: Arc<dyn ClaimsStore>,
    gateway: Arc<dyn ClearinghouseGateway>,
    locks: Arc<ClaimLocks>,
    gateway_timeout: Duration,
}

impl ClaimLifecycle {
    pub fn new(
        store: Arc<dyn ClaimsStore>,
        gateway: Arc<dyn ClearinghouseGateway>,
        locks: Arc<ClaimLocks>,
    ) -> Self {
        Self {
            store,
            gateway,
            locks,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    /// Creates and stores a draft claim
    pub async fn create_claim(&self, new: NewClaim) -> Result<Claim, BillingError> {
        let claim = Claim::draft(new)?;
        self.store.insert_claim(&claim).await?;

        tracing::info!(
            claim_id = %claim.id,
            claim_number = %claim.claim_number,
            amount = %claim.billed_amount,
            "claim created"
        );
        Ok(claim)
    }

    /// Submits a draft claim to the clearinghouse
    ///
    /// On transport failure the claim stays draft with the encoded payload
    /// cached, so a retry skips re-encoding. A definitive clearinghouse
    /// outcome moves the claim to accepted or rejected before the lock is
    /// released.
    pub async fn submit(&self, claim_id: ClaimId) -> Result<Claim, BillingError> {
        let _guard = self.locks.acquire(claim_id).await;

        let mut claim = self.store.get_claim(claim_id).await?;
        if claim.status != ClaimStatus::Draft {
            return Err(BillingError::invalid_state(
                "Claim",
                &claim.claim_number,
                claim.status,
                "submit",
            ));
        }

        let payload = match &claim.edi_837 {
            Some(cached) => cached.clone(),
            None => {
                let encoded = encode_837(&claim.edi_input())?;
                claim.edi_837 = Some(encoded.clone());
                self.store.update_claim(&claim).await?;
                encoded
            }
        };

        let outcome = match tokio::time::timeout(
            self.gateway_timeout,
            self.gateway.submit(&payload),
        )
        .await
        {
            Err(_elapsed) => {
                tracing::warn!(
                    claim_id = %claim_id,
                    timeout_ms = self.gateway_timeout.as_millis() as u64,
                    "clearinghouse submission timed out"
                );
                return Err(BillingError::Transport {
                    reason: format!(
                        "clearinghouse did not respond within {}ms",
                        self.gateway_timeout.as_millis()
                    ),
                });
            }
            Ok(Err(e)) => {
                tracing::warn!(claim_id = %claim_id, error = %e, "clearinghouse transport failure");
                return Err(BillingError::Transport {
                    reason: e.to_string(),
                });
            }
            Ok(Ok(outcome)) => outcome,
        };

        claim.mark_submitted()?;
        match outcome {
            SubmissionOutcome::Accepted => {
                claim.accept()?;
                tracing::info!(
                    claim_id = %claim_id,
                    claim_number = %claim.claim_number,
                    "claim accepted by clearinghouse"
                );
            }
            SubmissionOutcome::Rejected { reason } => {
                tracing::warn!(
                    claim_id = %claim_id,
                    claim_number = %claim.claim_number,
                    reason = %reason,
                    "claim rejected by clearinghouse"
                );
                claim.reject(reason)?;
            }
        }
        self.store.update_claim(&claim).await?;
        Ok(claim)
    }
}
