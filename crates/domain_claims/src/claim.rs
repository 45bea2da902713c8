//! Claim aggregate and state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use core_kernel::{ClaimId, Money, PatientId, ProviderId};
use edi_codec::Claim837;

use crate::error::BillingError;

/// Claim lifecycle state
///
/// `rejected`, `paid`, and `denied` are terminal; a rejected or denied
/// claim is resubmitted by creating a new claim, never by reopening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Editable, not yet sent to the clearinghouse
    Draft,
    /// Sent to the clearinghouse, acknowledgment pending
    Submitted,
    /// Accepted by the clearinghouse, awaiting remittance
    Accepted,
    /// Rejected by the clearinghouse
    Rejected,
    /// Payment posted from a remittance
    Paid,
    /// Denied by the payer
    Denied,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Draft => "draft",
            ClaimStatus::Submitted => "submitted",
            ClaimStatus::Accepted => "accepted",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Paid => "paid",
            ClaimStatus::Denied => "denied",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Rejected | ClaimStatus::Paid | ClaimStatus::Denied)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ClaimStatus::Draft),
            "submitted" => Ok(ClaimStatus::Submitted),
            "accepted" => Ok(ClaimStatus::Accepted),
            "rejected" => Ok(ClaimStatus::Rejected),
            "paid" => Ok(ClaimStatus::Paid),
            "denied" => Ok(ClaimStatus::Denied),
            other => Err(format!("unknown claim status: {other}")),
        }
    }
}

/// Data for creating a new draft claim
#[derive(Debug, Clone, Deserialize)]
pub struct NewClaim {
    pub patient_id: PatientId,
    pub provider_id: ProviderId,
    pub diagnosis_codes: Vec<String>,
    pub procedure_codes: Vec<String>,
    pub billed_amount: Money,
    pub service_date: NaiveDate,
}

/// A professional billing claim
///
/// The aggregate root of the billing pipeline. Claims are never physically
/// deleted; every change is a state transition and the transition
/// timestamps are each set at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// Claim number carried in CLM01 and matched against CLP01
    pub claim_number: String,
    /// Patient reference
    pub patient_id: PatientId,
    /// Billing provider reference
    pub provider_id: ProviderId,
    /// Ordered diagnosis codes
    pub diagnosis_codes: Vec<String>,
    /// Ordered procedure codes
    pub procedure_codes: Vec<String>,
    /// Total billed amount, always positive
    pub billed_amount: Money,
    /// Date of service
    pub service_date: NaiveDate,
    /// Lifecycle state
    pub status: ClaimStatus,
    /// Clearinghouse rejection reason, when rejected
    pub reject_reason: Option<String>,
    /// Cached 837 payload; generated on first submission attempt so a
    /// transport retry does not re-encode
    pub edi_837: Option<String>,
    /// Timestamps, each set at most once
    pub created_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub denied_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a new claim in `draft`
    ///
    /// The billed amount must be positive; diagnosis and procedure codes
    /// may still be empty at this point and are enforced at submission.
    pub fn draft(new: NewClaim) -> Result<Self, BillingError> {
        if !new.billed_amount.is_positive() {
            return Err(BillingError::InvalidAmount {
                amount: new.billed_amount.to_string(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: ClaimId::new_v7(),
            claim_number: generate_claim_number(),
            patient_id: new.patient_id,
            provider_id: new.provider_id,
            diagnosis_codes: new.diagnosis_codes,
            procedure_codes: new.procedure_codes,
            billed_amount: new.billed_amount,
            service_date: new.service_date,
            status: ClaimStatus::Draft,
            reject_reason: None,
            edi_837: None,
            created_at: now,
            submitted_at: None,
            accepted_at: None,
            rejected_at: None,
            paid_at: None,
            denied_at: None,
            updated_at: now,
        })
    }

    /// The claim fields the 837 encoder consumes
    pub fn edi_input(&self) -> Claim837 {
        Claim837 {
            claim_number: self.claim_number.clone(),
            patient: self.patient_id.to_string(),
            provider: self.provider_id.to_string(),
            diagnosis_codes: self.diagnosis_codes.clone(),
            procedure_codes: self.procedure_codes.clone(),
            billed_amount: self.billed_amount,
            service_date: self.service_date,
        }
    }

    /// Checks if a transition is valid
    fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self.status, target),
            (Draft, Submitted)
                | (Submitted, Accepted)
                | (Submitted, Rejected)
                | (Accepted, Paid)
                | (Accepted, Denied)
        )
    }

    fn transition(&mut self, target: ClaimStatus, operation: &'static str) -> Result<(), BillingError> {
        if !self.can_transition_to(target) {
            return Err(BillingError::invalid_state(
                "Claim",
                &self.claim_number,
                self.status,
                operation,
            ));
        }

        let now = Utc::now();
        self.status = target;
        self.updated_at = now;

        // Each transition timestamp is set at most once
        let slot = match target {
            ClaimStatus::Submitted => &mut self.submitted_at,
            ClaimStatus::Accepted => &mut self.accepted_at,
            ClaimStatus::Rejected => &mut self.rejected_at,
            ClaimStatus::Paid => &mut self.paid_at,
            ClaimStatus::Denied => &mut self.denied_at,
            ClaimStatus::Draft => return Ok(()),
        };
        if slot.is_none() {
            *slot = Some(now);
        }
        Ok(())
    }

    /// Moves a draft claim to `submitted`
    pub fn mark_submitted(&mut self) -> Result<(), BillingError> {
        self.transition(ClaimStatus::Submitted, "submit")
    }

    /// Records clearinghouse acceptance
    pub fn accept(&mut self) -> Result<(), BillingError> {
        self.transition(ClaimStatus::Accepted, "accept")
    }

    /// Records clearinghouse rejection with its reason
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), BillingError> {
        self.transition(ClaimStatus::Rejected, "reject")?;
        self.reject_reason = Some(reason.into());
        Ok(())
    }

    /// Moves an accepted claim to `paid` after a payment was posted
    pub fn mark_paid(&mut self) -> Result<(), BillingError> {
        self.transition(ClaimStatus::Paid, "mark paid")
    }

    /// Moves an accepted claim to `denied` after a denial was recorded
    pub fn mark_denied(&mut self) -> Result<(), BillingError> {
        self.transition(ClaimStatus::Denied, "mark denied")
    }
}

/// Generates a claim number: millisecond timestamp plus a random suffix
fn generate_claim_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix = Uuid::new_v4().as_fields().0 % 10_000;
    format!("CLM-{}-{:04}", millis % 10_000_000_000, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn new_claim() -> NewClaim {
        NewClaim {
            patient_id: PatientId::new(),
            provider_id: ProviderId::new(),
            diagnosis_codes: vec!["F32.9".to_string()],
            procedure_codes: vec!["90834".to_string()],
            billed_amount: Money::new(dec!(150.00), Currency::USD),
            service_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        }
    }

    #[test]
    fn test_draft_starts_in_draft_state() {
        let claim = Claim::draft(new_claim()).unwrap();
        assert_eq!(claim.status, ClaimStatus::Draft);
        assert!(claim.claim_number.starts_with("CLM-"));
        assert!(claim.submitted_at.is_none());
        assert!(claim.edi_837.is_none());
    }

    #[test]
    fn test_draft_rejects_non_positive_amount() {
        let mut new = new_claim();
        new.billed_amount = Money::zero(Currency::USD);
        assert!(matches!(
            Claim::draft(new),
            Err(BillingError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_claim_numbers_are_unique() {
        let a = Claim::draft(new_claim()).unwrap();
        let b = Claim::draft(new_claim()).unwrap();
        assert_ne!(a.claim_number, b.claim_number);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut claim = Claim::draft(new_claim()).unwrap();
        claim.mark_submitted().unwrap();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        claim.accept().unwrap();
        assert_eq!(claim.status, ClaimStatus::Accepted);
        claim.mark_paid().unwrap();
        assert_eq!(claim.status, ClaimStatus::Paid);

        assert!(claim.submitted_at.is_some());
        assert!(claim.accepted_at.is_some());
        assert!(claim.paid_at.is_some());
        assert!(claim.denied_at.is_none());
    }

    #[test]
    fn test_timestamps_are_monotonic() {
        let mut claim = Claim::draft(new_claim()).unwrap();
        claim.mark_submitted().unwrap();
        claim.accept().unwrap();
        claim.mark_paid().unwrap();

        assert!(claim.submitted_at.unwrap() >= claim.created_at);
        assert!(claim.accepted_at.unwrap() >= claim.submitted_at.unwrap());
        assert!(claim.paid_at.unwrap() >= claim.accepted_at.unwrap());
    }

    #[test]
    fn test_paid_is_terminal() {
        let mut claim = Claim::draft(new_claim()).unwrap();
        claim.mark_submitted().unwrap();
        claim.accept().unwrap();
        claim.mark_paid().unwrap();

        assert!(claim.mark_denied().is_err());
        assert!(claim.mark_submitted().is_err());
        assert!(claim.status.is_terminal());
    }

    #[test]
    fn test_rejected_is_terminal() {
        let mut claim = Claim::draft(new_claim()).unwrap();
        claim.mark_submitted().unwrap();
        claim.reject("missing subscriber id").unwrap();

        assert_eq!(claim.status, ClaimStatus::Rejected);
        assert_eq!(claim.reject_reason.as_deref(), Some("missing subscriber id"));
        assert!(claim.mark_submitted().is_err());
        assert!(claim.accept().is_err());
    }

    #[test]
    fn test_cannot_skip_submission() {
        let mut claim = Claim::draft(new_claim()).unwrap();
        let err = claim.accept().unwrap_err();
        assert!(matches!(err, BillingError::InvalidState { .. }));
        assert_eq!(claim.status, ClaimStatus::Draft);
    }

    #[test]
    fn test_denied_from_accepted() {
        let mut claim = Claim::draft(new_claim()).unwrap();
        claim.mark_submitted().unwrap();
        claim.accept().unwrap();
        claim.mark_denied().unwrap();

        assert_eq!(claim.status, ClaimStatus::Denied);
        assert!(claim.denied_at.is_some());
        assert!(claim.paid_at.is_none());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ClaimStatus::Draft,
            ClaimStatus::Submitted,
            ClaimStatus::Accepted,
            ClaimStatus::Rejected,
            ClaimStatus::Paid,
            ClaimStatus::Denied,
        ] {
            let parsed: ClaimStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
