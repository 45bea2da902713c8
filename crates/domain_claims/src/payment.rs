//! Posted claim payments

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{ClaimId, EraId, Money, PaymentId};

use crate::error::BillingError;

/// Payment posting state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Posted,
    Voided,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Posted => "posted",
            PaymentStatus::Voided => "voided",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posted" => Ok(PaymentStatus::Posted),
            "voided" => Ok(PaymentStatus::Voided),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// A posted money movement against a claim
///
/// `era_id` is `None` for manual payments posted outside remittance
/// processing. At most one non-voided payment may exist per (claim, ERA)
/// pair; the reconciler enforces this before insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub claim_id: ClaimId,
    pub era_id: Option<EraId>,
    pub check_number: String,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub status: PaymentStatus,
    pub posted_at: DateTime<Utc>,
    pub voided_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Creates a posted payment
    pub fn post(
        claim_id: ClaimId,
        era_id: Option<EraId>,
        amount: Money,
        check_number: impl Into<String>,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: PaymentId::new_v7(),
            claim_id,
            era_id,
            check_number: check_number.into(),
            amount,
            payment_date,
            status: PaymentStatus::Posted,
            posted_at: Utc::now(),
            voided_at: None,
        }
    }

    pub fn is_voided(&self) -> bool {
        self.status == PaymentStatus::Voided
    }

    /// Voids a posted payment; voiding is one-way
    pub fn void(&mut self) -> Result<(), BillingError> {
        if self.status != PaymentStatus::Posted {
            return Err(BillingError::invalid_state(
                "Payment",
                self.id,
                self.status,
                "void",
            ));
        }
        self.status = PaymentStatus::Voided;
        self.voided_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_post_creates_posted_payment() {
        let payment = Payment::post(
            ClaimId::new(),
            Some(EraId::new()),
            Money::new(dec!(150.00), Currency::USD),
            "CHK5001",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );

        assert_eq!(payment.status, PaymentStatus::Posted);
        assert!(payment.voided_at.is_none());
    }

    #[test]
    fn test_void_is_one_way() {
        let mut payment = Payment::post(
            ClaimId::new(),
            None,
            Money::new(dec!(25.00), Currency::USD),
            "CHK1",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        );

        payment.void().unwrap();
        assert_eq!(payment.status, PaymentStatus::Voided);
        assert!(payment.voided_at.is_some());
        assert!(payment.void().is_err());
    }
}
