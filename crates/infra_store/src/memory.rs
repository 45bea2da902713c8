//! In-memory store adapter
//!
//! Backs the default server configuration and the integration tests.
//! Each collection sits behind its own RwLock; cross-entity consistency
//! comes from the domain's per-claim locks, not from the store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{ClaimId, EraId, PaymentId};
use domain_claims::{Claim, ClaimsStore, Denial, Payment, RemittanceAdvice, StoreError};

/// Map-backed implementation of the `ClaimsStore` port
#[derive(Default)]
pub struct InMemoryStore {
    claims: RwLock<HashMap<ClaimId, Claim>>,
    eras: RwLock<HashMap<EraId, RemittanceAdvice>>,
    payments: RwLock<HashMap<PaymentId, Payment>>,
    denials: RwLock<Vec<Denial>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimsStore for InMemoryStore {
    async fn insert_claim(&self, claim: &Claim) -> Result<(), StoreError> {
        let mut claims = self.claims.write().await;
        if claims.contains_key(&claim.id) {
            return Err(StoreError::Conflict(format!(
                "claim {} already exists",
                claim.id
            )));
        }
        claims.insert(claim.id, claim.clone());
        Ok(())
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, StoreError> {
        self.claims
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Claim", id))
    }

    async fn find_claim_by_number(
        &self,
        claim_number: &str,
    ) -> Result<Option<Claim>, StoreError> {
        Ok(self
            .claims
            .read()
            .await
            .values()
            .find(|c| c.claim_number == claim_number)
            .cloned())
    }

    async fn update_claim(&self, claim: &Claim) -> Result<(), StoreError> {
        let mut claims = self.claims.write().await;
        if !claims.contains_key(&claim.id) {
            return Err(StoreError::not_found("Claim", claim.id));
        }
        claims.insert(claim.id, claim.clone());
        Ok(())
    }

    async fn list_claims(&self) -> Result<Vec<Claim>, StoreError> {
        let mut claims: Vec<Claim> = self.claims.read().await.values().cloned().collect();
        claims.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(claims)
    }

    async fn insert_era(&self, era: &RemittanceAdvice) -> Result<(), StoreError> {
        let mut eras = self.eras.write().await;
        if eras.contains_key(&era.id) {
            return Err(StoreError::Conflict(format!("ERA {} already exists", era.id)));
        }
        eras.insert(era.id, era.clone());
        Ok(())
    }

    async fn get_era(&self, id: EraId) -> Result<RemittanceAdvice, StoreError> {
        self.eras
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("ERA", id))
    }

    async fn update_era(&self, era: &RemittanceAdvice) -> Result<(), StoreError> {
        let mut eras = self.eras.write().await;
        if !eras.contains_key(&era.id) {
            return Err(StoreError::not_found("ERA", era.id));
        }
        eras.insert(era.id, era.clone());
        Ok(())
    }

    async fn insert_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        if payments.contains_key(&payment.id) {
            return Err(StoreError::Conflict(format!(
                "payment {} already exists",
                payment.id
            )));
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Payment, StoreError> {
        self.payments
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Payment", id))
    }

    async fn update_payment(&self, payment: &Payment) -> Result<(), StoreError> {
        let mut payments = self.payments.write().await;
        if !payments.contains_key(&payment.id) {
            return Err(StoreError::not_found("Payment", payment.id));
        }
        payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_payment(
        &self,
        claim_id: ClaimId,
        era_id: Option<EraId>,
    ) -> Result<Option<Payment>, StoreError> {
        Ok(self
            .payments
            .read()
            .await
            .values()
            .find(|p| p.claim_id == claim_id && p.era_id == era_id && !p.is_voided())
            .cloned())
    }

    async fn payments_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Payment>, StoreError> {
        let mut payments: Vec<Payment> = self
            .payments
            .read()
            .await
            .values()
            .filter(|p| p.claim_id == claim_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| a.posted_at.cmp(&b.posted_at));
        Ok(payments)
    }

    async fn insert_denial(&self, denial: &Denial) -> Result<(), StoreError> {
        self.denials.write().await.push(denial.clone());
        Ok(())
    }

    async fn denials_for_claim(&self, claim_id: ClaimId) -> Result<Vec<Denial>, StoreError> {
        Ok(self
            .denials
            .read()
            .await
            .iter()
            .filter(|d| d.claim_id == claim_id)
            .cloned()
            .collect())
    }
}
