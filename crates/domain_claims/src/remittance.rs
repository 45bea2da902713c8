//! Remittance ingestion and processing

use std::sync::Arc;

use core_kernel::{EraId, PayerId};
use edi_codec::{decode_835, RemittanceData};

use crate::claim::Claim;
use crate::denial::{DenialCategory, DenialManager};
use crate::era::{EraStatus, RemittanceAdvice};
use crate::error::BillingError;
use crate::locks::ClaimLocks;
use crate::ports::ClaimsStore;
use crate::reconciler::PaymentReconciler;

/// Ingests raw 835 payloads and reconciles them against claims
///
/// Decode failures and orphaned remittances are outcomes, not errors: the
/// ERA is marked `error` with a reason and returned `Ok`. `Err` is reserved
/// for precondition violations (unknown ERA, already-terminal ERA) and
/// infrastructure failures.
#[derive(Clone)]
pub struct RemittanceProcessor {
    store: Arc<dyn ClaimsStore>,
    reconciler: PaymentReconciler,
    denials: DenialManager,
    locks: Arc<ClaimLocks>,
}

impl RemittanceProcessor {
    pub fn new(
        store: Arc<dyn ClaimsStore>,
        reconciler: PaymentReconciler,
        denials: DenialManager,
        locks: Arc<ClaimLocks>,
    ) -> Self {
        Self {
            store,
            reconciler,
            denials,
            locks,
        }
    }

    /// Stores a raw 835 payload without interpreting it
    pub async fn ingest(
        &self,
        raw_edi: &str,
        payer_id: Option<PayerId>,
    ) -> Result<RemittanceAdvice, BillingError> {
        let era = RemittanceAdvice::received(raw_edi, payer_id);
        self.store.insert_era(&era).await?;

        tracing::info!(era_id = %era.id, bytes = raw_edi.len(), "remittance received");
        Ok(era)
    }

    /// Processes a received ERA to its terminal status
    pub async fn process(&self, era_id: EraId) -> Result<RemittanceAdvice, BillingError> {
        let era = self.store.get_era(era_id).await?;
        if era.status != EraStatus::Received {
            return Err(BillingError::invalid_state(
                "ERA", era.id, era.status, "process",
            ));
        }

        let remit = match decode_835(&era.raw_edi) {
            Ok(remit) => remit,
            Err(e) => {
                tracing::warn!(era_id = %era_id, error = %e, "remittance decode failed");
                return self.fail(era, e.to_string()).await;
            }
        };

        let Some(claim) = self.store.find_claim_by_number(&remit.claim_number).await? else {
            tracing::warn!(
                era_id = %era_id,
                claim_number = %remit.claim_number,
                "remittance references unknown claim"
            );
            return self
                .fail(
                    era,
                    format!("no claim matches number {}", remit.claim_number),
                )
                .await;
        };

        // Serialize against submission and other ERAs for the same claim.
        let _guard = self.locks.acquire(claim.id).await;
        // Re-read under the lock; both records may have moved.
        let claim = self.store.get_claim(claim.id).await?;
        let era = self.store.get_era(era_id).await?;
        if era.status != EraStatus::Received {
            return Err(BillingError::invalid_state(
                "ERA", era.id, era.status, "process",
            ));
        }

        if remit.paid_amount.is_positive() {
            self.reconcile_payment(era, remit, claim).await
        } else {
            self.reconcile_denial(era, remit, claim).await
        }
    }

    async fn reconcile_payment(
        &self,
        mut era: RemittanceAdvice,
        remit: RemittanceData,
        mut claim: Claim,
    ) -> Result<RemittanceAdvice, BillingError> {
        use crate::claim::ClaimStatus;

        // A paid claim with a payment already recorded for this exact ERA
        // means a crash between posting and marking: finish the marking.
        if claim.status == ClaimStatus::Paid {
            if self
                .store
                .find_payment(claim.id, Some(era.id))
                .await?
                .is_some()
            {
                era.mark_processed(&remit)?;
                self.store.update_era(&era).await?;
                tracing::info!(era_id = %era.id, claim_id = %claim.id, "resumed interrupted processing");
                return Ok(era);
            }
            return self
                .fail(era, format!("claim {} already paid", claim.claim_number))
                .await;
        }

        if claim.status != ClaimStatus::Accepted {
            return self
                .fail(
                    era,
                    format!(
                        "claim {} is {}, payment requires accepted",
                        claim.claim_number, claim.status
                    ),
                )
                .await;
        }

        // No DTM*405 in the 835: date the payment on the day we process it.
        let payment_date = remit
            .payment_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        self.reconciler
            .post_payment(
                claim.id,
                Some(era.id),
                remit.paid_amount,
                &remit.check_number,
                payment_date,
            )
            .await?;

        claim.mark_paid()?;
        self.store.update_claim(&claim).await?;
        era.mark_processed(&remit)?;
        self.store.update_era(&era).await?;

        tracing::info!(
            era_id = %era.id,
            claim_id = %claim.id,
            amount = %remit.paid_amount,
            "remittance reconciled as payment"
        );
        Ok(era)
    }

    async fn reconcile_denial(
        &self,
        era: RemittanceAdvice,
        remit: RemittanceData,
        mut claim: Claim,
    ) -> Result<RemittanceAdvice, BillingError> {
        use crate::claim::ClaimStatus;

        let Some(adjustment) = remit.adjustments.first() else {
            return self
                .fail(era, "zero paid amount without adjustment detail".to_string())
                .await;
        };
        let code = adjustment.code();
        let Some(category) = DenialCategory::from_code(&code) else {
            return self
                .fail(era, format!("unrecognized adjustment group in code {code}"))
                .await;
        };

        if claim.status != ClaimStatus::Accepted {
            return self
                .fail(
                    era,
                    format!(
                        "claim {} is {}, denial requires accepted",
                        claim.claim_number, claim.status
                    ),
                )
                .await;
        }

        let denied_on = remit
            .payment_date
            .unwrap_or_else(|| chrono::Utc::now().date_naive());
        let reason = format!("payer adjustment {code}");
        self.denials
            .record_denial_on(claim.id, &code, &reason, Some(category), denied_on)
            .await?;

        claim.mark_denied()?;
        self.store.update_claim(&claim).await?;

        let mut era = era;
        era.mark_processed(&remit)?;
        self.store.update_era(&era).await?;

        tracing::info!(
            era_id = %era.id,
            claim_id = %claim.id,
            code = %code,
            "remittance reconciled as denial"
        );
        Ok(era)
    }

    async fn fail(
        &self,
        mut era: RemittanceAdvice,
        reason: String,
    ) -> Result<RemittanceAdvice, BillingError> {
        era.mark_error(reason)?;
        self.store.update_era(&era).await?;
        Ok(era)
    }
}
