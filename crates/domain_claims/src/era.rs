//! Electronic remittance advice records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{EraId, Money, PayerId};
use edi_codec::RemittanceData;

use crate::error::BillingError;

/// Processing state of a received remittance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraStatus {
    /// Stored, not yet processed
    Received,
    /// Fully reconciled: a payment was posted or a denial recorded
    Processed,
    /// Processing failed; queued for manual review
    Error,
}

impl EraStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EraStatus::Received => "received",
            EraStatus::Processed => "processed",
            EraStatus::Error => "error",
        }
    }
}

impl fmt::Display for EraStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EraStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(EraStatus::Received),
            "processed" => Ok(EraStatus::Processed),
            "error" => Ok(EraStatus::Error),
            other => Err(format!("unknown ERA status: {other}")),
        }
    }
}

/// One received X12 835 payload
///
/// ERAs are stored as soon as they arrive, before the referenced claim is
/// resolved locally, so late and duplicate remittances are never dropped.
/// An ERA reaches exactly one terminal status (`processed` or `error`),
/// driven by the remittance processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemittanceAdvice {
    pub id: EraId,
    /// Payer reference, when known at ingestion
    pub payer_id: Option<PayerId>,
    /// Claim number from CLP01, filled in at processing time
    pub claim_number: Option<String>,
    /// Check/reference number from REF*EV
    pub check_number: Option<String>,
    /// Paid amount from CLP03
    pub check_amount: Option<Money>,
    /// Payment date from DTM*405
    pub payment_date: Option<NaiveDate>,
    /// Raw 835 payload as received
    pub raw_edi: String,
    pub status: EraStatus,
    /// Failure reason, when status is `error`
    pub error_reason: Option<String>,
    pub received_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl RemittanceAdvice {
    /// Stores a raw 835 payload in `received`
    pub fn received(raw_edi: impl Into<String>, payer_id: Option<PayerId>) -> Self {
        Self {
            id: EraId::new_v7(),
            payer_id,
            claim_number: None,
            check_number: None,
            check_amount: None,
            payment_date: None,
            raw_edi: raw_edi.into(),
            status: EraStatus::Received,
            error_reason: None,
            received_at: Utc::now(),
            processed_at: None,
        }
    }

    fn guard_received(&self, operation: &'static str) -> Result<(), BillingError> {
        if self.status != EraStatus::Received {
            return Err(BillingError::invalid_state(
                "ERA",
                self.id,
                self.status,
                operation,
            ));
        }
        Ok(())
    }

    /// Marks the ERA fully reconciled, copying the decoded fields
    pub fn mark_processed(&mut self, remit: &RemittanceData) -> Result<(), BillingError> {
        self.guard_received("process")?;
        self.claim_number = Some(remit.claim_number.clone());
        self.check_number = Some(remit.check_number.clone());
        self.check_amount = Some(remit.paid_amount);
        self.payment_date = remit.payment_date;
        self.status = EraStatus::Processed;
        self.processed_at = Some(Utc::now());
        Ok(())
    }

    /// Marks processing failed; the ERA stays stored for manual review
    pub fn mark_error(&mut self, reason: impl Into<String>) -> Result<(), BillingError> {
        self.guard_received("mark error")?;
        self.status = EraStatus::Error;
        self.error_reason = Some(reason.into());
        self.processed_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn remit() -> RemittanceData {
        RemittanceData {
            claim_number: "CLM-100".to_string(),
            paid_amount: Money::new(dec!(150.00), Currency::USD),
            check_number: "CHK5001".to_string(),
            payment_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            adjustments: vec![],
        }
    }

    #[test]
    fn test_received_era_has_no_decoded_fields() {
        let era = RemittanceAdvice::received("CLP*CLM-100*1*150.00~", None);
        assert_eq!(era.status, EraStatus::Received);
        assert!(era.claim_number.is_none());
        assert!(era.processed_at.is_none());
    }

    #[test]
    fn test_mark_processed_copies_decoded_fields() {
        let mut era = RemittanceAdvice::received("raw", None);
        era.mark_processed(&remit()).unwrap();

        assert_eq!(era.status, EraStatus::Processed);
        assert_eq!(era.claim_number.as_deref(), Some("CLM-100"));
        assert_eq!(era.check_number.as_deref(), Some("CHK5001"));
        assert!(era.processed_at.is_some());
    }

    #[test]
    fn test_terminal_status_reached_exactly_once() {
        let mut era = RemittanceAdvice::received("raw", None);
        era.mark_processed(&remit()).unwrap();

        assert!(era.mark_processed(&remit()).is_err());
        assert!(era.mark_error("late").is_err());
    }

    #[test]
    fn test_mark_error_records_reason() {
        let mut era = RemittanceAdvice::received("raw", None);
        era.mark_error("missing CLP segment").unwrap();

        assert_eq!(era.status, EraStatus::Error);
        assert_eq!(era.error_reason.as_deref(), Some("missing CLP segment"));
        assert!(era.mark_processed(&remit()).is_err());
    }
}
