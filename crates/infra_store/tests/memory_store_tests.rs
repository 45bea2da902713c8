//! Contract tests for the in-memory store adapter

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use core_kernel::{ClaimId, EraId, Money, PaymentId};
use domain_claims::{Claim, ClaimsStore, Payment, RemittanceAdvice, StoreError};
use infra_store::InMemoryStore;
use test_utils::TestClaimBuilder;

fn sample_claim() -> Claim {
    TestClaimBuilder::new().build()
}

fn sample_payment(claim_id: ClaimId, era_id: Option<EraId>) -> Payment {
    Payment::post(
        claim_id,
        era_id,
        Money::usd(dec!(150.00)),
        "CHK5001",
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
    )
}

mod claims {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let store = InMemoryStore::new();
        let claim = sample_claim();

        store.insert_claim(&claim).await.unwrap();
        let fetched = store.get_claim(claim.id).await.unwrap();

        assert_eq!(fetched.claim_number, claim.claim_number);
        assert_eq!(fetched.billed_amount, claim.billed_amount);
        assert_eq!(fetched.status, claim.status);
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = InMemoryStore::new();
        let claim = sample_claim();

        store.insert_claim(&claim).await.unwrap();
        let err = store.insert_claim(&claim).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_get_missing_claim_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.get_claim(ClaimId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_find_by_number() {
        let store = InMemoryStore::new();
        let claim = sample_claim();
        store.insert_claim(&claim).await.unwrap();

        let found = store
            .find_claim_by_number(&claim.claim_number)
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(claim.id));

        let missing = store.find_claim_by_number("CLM-MISSING").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_requires_existing_claim() {
        let store = InMemoryStore::new();
        let claim = sample_claim();
        let err = store.update_claim(&claim).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_persists_state_change() {
        let store = InMemoryStore::new();
        let mut claim = sample_claim();
        store.insert_claim(&claim).await.unwrap();

        claim.mark_submitted().unwrap();
        claim.accept().unwrap();
        store.update_claim(&claim).await.unwrap();

        let fetched = store.get_claim(claim.id).await.unwrap();
        assert_eq!(fetched.status, domain_claims::ClaimStatus::Accepted);
        assert!(fetched.accepted_at.is_some());
    }

    #[tokio::test]
    async fn test_list_orders_by_creation() {
        let store = InMemoryStore::new();
        let first = sample_claim();
        let second = sample_claim();
        store.insert_claim(&first).await.unwrap();
        store.insert_claim(&second).await.unwrap();

        let all = store.list_claims().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at <= all[1].created_at);
    }
}

mod eras {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_update_round_trip() {
        let store = InMemoryStore::new();
        let mut era = RemittanceAdvice::received("CLP*CLM-1*1*150.00~", None);
        store.insert_era(&era).await.unwrap();

        era.mark_error("no matching claim").unwrap();
        store.update_era(&era).await.unwrap();

        let fetched = store.get_era(era.id).await.unwrap();
        assert_eq!(fetched.status, domain_claims::EraStatus::Error);
        assert_eq!(fetched.error_reason.as_deref(), Some("no matching claim"));
    }
}

mod payments {
    use super::*;

    #[tokio::test]
    async fn test_find_payment_matches_claim_and_era() {
        let store = InMemoryStore::new();
        let claim_id = ClaimId::new();
        let era_id = EraId::new();
        store
            .insert_payment(&sample_payment(claim_id, Some(era_id)))
            .await
            .unwrap();

        assert!(store
            .find_payment(claim_id, Some(era_id))
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_payment(claim_id, Some(EraId::new()))
            .await
            .unwrap()
            .is_none());
        assert!(store.find_payment(claim_id, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_payment_skips_voided() {
        let store = InMemoryStore::new();
        let claim_id = ClaimId::new();
        let era_id = EraId::new();
        let mut payment = sample_payment(claim_id, Some(era_id));
        store.insert_payment(&payment).await.unwrap();

        payment.void().unwrap();
        store.update_payment(&payment).await.unwrap();

        assert!(store
            .find_payment(claim_id, Some(era_id))
            .await
            .unwrap()
            .is_none());
        // Still visible in the full history
        assert_eq!(store.payments_for_claim(claim_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_payment_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.get_payment(PaymentId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
