//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields and take defaults for the rest.

use chrono::NaiveDate;
use core_kernel::{Currency, Money, PatientId, ProviderId};
use domain_claims::{Claim, NewClaim};

use crate::fixtures::{DateFixtures, MoneyFixtures};

/// Builder for draft claims
pub struct TestClaimBuilder {
    patient_id: PatientId,
    provider_id: ProviderId,
    diagnosis_codes: Vec<String>,
    procedure_codes: Vec<String>,
    billed_amount: Money,
    service_date: NaiveDate,
}

impl Default for TestClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClaimBuilder {
    pub fn new() -> Self {
        Self {
            patient_id: PatientId::new(),
            provider_id: ProviderId::new(),
            diagnosis_codes: vec!["F32.9".to_string()],
            procedure_codes: vec!["90834".to_string()],
            billed_amount: MoneyFixtures::billed_amount(),
            service_date: DateFixtures::service_date(),
        }
    }

    pub fn with_patient_id(mut self, id: PatientId) -> Self {
        self.patient_id = id;
        self
    }

    pub fn with_provider_id(mut self, id: ProviderId) -> Self {
        self.provider_id = id;
        self
    }

    pub fn with_diagnosis_codes(mut self, codes: Vec<&str>) -> Self {
        self.diagnosis_codes = codes.into_iter().map(String::from).collect();
        self
    }

    pub fn with_procedure_codes(mut self, codes: Vec<&str>) -> Self {
        self.procedure_codes = codes.into_iter().map(String::from).collect();
        self
    }

    pub fn with_billed_amount(mut self, amount: Money) -> Self {
        self.billed_amount = amount;
        self
    }

    pub fn with_service_date(mut self, date: NaiveDate) -> Self {
        self.service_date = date;
        self
    }

    pub fn build_new(self) -> NewClaim {
        NewClaim {
            patient_id: self.patient_id,
            provider_id: self.provider_id,
            diagnosis_codes: self.diagnosis_codes,
            procedure_codes: self.procedure_codes,
            billed_amount: self.billed_amount,
            service_date: self.service_date,
        }
    }

    /// Builds a draft claim; panics on invalid builder data, which is
    /// acceptable in tests
    pub fn build(self) -> Claim {
        Claim::draft(self.build_new()).expect("test claim data should be valid")
    }
}

/// Builder for raw X12 835 remittance payloads
pub struct Era835Builder {
    claim_number: String,
    claim_status_code: String,
    paid_amount: String,
    check_number: Option<String>,
    payment_date: Option<String>,
    adjustments: Vec<(String, String, String)>,
}

impl Era835Builder {
    pub fn new(claim_number: impl Into<String>) -> Self {
        Self {
            claim_number: claim_number.into(),
            claim_status_code: "1".to_string(),
            paid_amount: "150.00".to_string(),
            check_number: Some("CHK5001".to_string()),
            payment_date: Some("20240115".to_string()),
            adjustments: Vec::new(),
        }
    }

    pub fn with_paid_amount(mut self, amount: impl Into<String>) -> Self {
        self.paid_amount = amount.into();
        self
    }

    pub fn with_check_number(mut self, check: impl Into<String>) -> Self {
        self.check_number = Some(check.into());
        self
    }

    pub fn without_check_number(mut self) -> Self {
        self.check_number = None;
        self
    }

    /// Payment date in X12 `YYYYMMDD` form
    pub fn with_payment_date(mut self, date: impl Into<String>) -> Self {
        self.payment_date = Some(date.into());
        self
    }

    pub fn without_payment_date(mut self) -> Self {
        self.payment_date = None;
        self
    }

    /// Adds a CAS adjustment segment, e.g. `("CO", "50", "150.00")`
    pub fn with_adjustment(
        mut self,
        group: impl Into<String>,
        reason: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        self.adjustments
            .push((group.into(), reason.into(), amount.into()));
        self
    }

    /// Marks the claim denied: zero paid amount, CLP status 4
    pub fn denied(mut self) -> Self {
        self.paid_amount = "0.00".to_string();
        self.claim_status_code = "4".to_string();
        self
    }

    pub fn build(self) -> String {
        let mut segments = vec![format!(
            "CLP*{}*{}*{}",
            self.claim_number, self.claim_status_code, self.paid_amount
        )];
        for (group, reason, amount) in &self.adjustments {
            segments.push(format!("CAS*{group}*{reason}*{amount}"));
        }
        if let Some(check) = &self.check_number {
            segments.push(format!("REF*EV*{check}"));
        }
        if let Some(date) = &self.payment_date {
            segments.push(format!("DTM*405*{date}"));
        }
        let mut raw = segments.join("~");
        raw.push('~');
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_claim_builder_defaults() {
        let claim = TestClaimBuilder::new().build();
        assert_eq!(claim.billed_amount, Money::usd(dec!(150.00)));
        assert!(!claim.diagnosis_codes.is_empty());
    }

    #[test]
    fn test_era_builder_payment_layout() {
        let raw = Era835Builder::new("CLM-100").build();
        assert_eq!(raw, "CLP*CLM-100*1*150.00~REF*EV*CHK5001~DTM*405*20240115~");
    }

    #[test]
    fn test_era_builder_denial_layout() {
        let raw = Era835Builder::new("CLM-100")
            .denied()
            .with_adjustment("CO", "50", "150.00")
            .build();
        assert!(raw.starts_with("CLP*CLM-100*4*0.00~CAS*CO*50*150.00~"));
    }

    #[test]
    fn test_era_builder_omits_optional_segments() {
        let raw = Era835Builder::new("CLM-100")
            .without_check_number()
            .without_payment_date()
            .build();
        assert_eq!(raw, "CLP*CLM-100*1*150.00~");
    }
}
