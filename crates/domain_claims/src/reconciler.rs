//! Payment posting with at-most-once semantics per (claim, ERA)

use chrono::NaiveDate;
use std::sync::Arc;

use core_kernel::{ClaimId, EraId, Money, PaymentId};

use crate::error::BillingError;
use crate::payment::Payment;
use crate::ports::ClaimsStore;

/// Posts and voids payments against claims
///
/// Posting is idempotent per (claim, ERA): reprocessing the same
/// remittance after a crash returns the payment recorded the first time
/// instead of double-paying.
#[derive(Clone)]
pub struct PaymentReconciler {
    store: Arc<dyn ClaimsStore>,
}

impl PaymentReconciler {
    pub fn new(store: Arc<dyn ClaimsStore>) -> Self {
        Self { store }
    }

    pub async fn post_payment(
        &self,
        claim_id: ClaimId,
        era_id: Option<EraId>,
        amount: Money,
        check_number: &str,
        payment_date: NaiveDate,
    ) -> Result<Payment, BillingError> {
        if !amount.is_positive() {
            return Err(BillingError::InvalidAmount {
                amount: amount.to_string(),
            });
        }

        if let Some(existing) = self.store.find_payment(claim_id, era_id).await? {
            tracing::debug!(
                claim_id = %claim_id,
                payment_id = %existing.id,
                "payment already posted for this remittance, returning existing"
            );
            return Ok(existing);
        }

        let payment = Payment::post(claim_id, era_id, amount, check_number, payment_date);
        self.store.insert_payment(&payment).await?;

        tracing::info!(
            claim_id = %claim_id,
            payment_id = %payment.id,
            amount = %amount,
            check_number,
            "payment posted"
        );
        Ok(payment)
    }

    /// Marks a posted payment voided. Voiding does not rewind claim state;
    /// a corrected remittance drives any follow-up.
    pub async fn void_payment(&self, payment_id: PaymentId) -> Result<Payment, BillingError> {
        let mut payment = self.store.get_payment(payment_id).await?;
        payment.void()?;
        self.store.update_payment(&payment).await?;

        tracing::info!(payment_id = %payment_id, "payment voided");
        Ok(payment)
    }
}
