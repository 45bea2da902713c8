//! 837 professional claim encoding

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::error::EdiError;
use crate::x12::{join_segments, segment};

/// The claim fields the 837 encoder consumes
///
/// This is deliberately a plain data carrier rather than the full claim
/// aggregate: the codec stays decoupled from lifecycle state and can be
/// driven directly in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim837 {
    /// Claim number, rendered into CLM01
    pub claim_number: String,
    /// Patient reference (subscriber identification)
    pub patient: String,
    /// Billing provider reference
    pub provider: String,
    /// Ordered diagnosis codes, rendered into HI
    pub diagnosis_codes: Vec<String>,
    /// Ordered procedure codes, rendered into SV2
    pub procedure_codes: Vec<String>,
    /// Total billed amount, rendered into CLM02
    pub billed_amount: Money,
    /// Date of service, rendered into DTP
    pub service_date: NaiveDate,
}

impl Claim837 {
    fn validate(&self) -> Result<(), EdiError> {
        let fail = |field| Err(EdiError::encoding(&self.claim_number, field));

        if self.claim_number.trim().is_empty() {
            return fail("claim_number");
        }
        if self.patient.trim().is_empty() {
            return fail("patient");
        }
        if self.provider.trim().is_empty() {
            return fail("provider");
        }
        if self.diagnosis_codes.is_empty() || self.diagnosis_codes.iter().any(|c| c.trim().is_empty()) {
            return fail("diagnosis_codes");
        }
        if self.procedure_codes.is_empty() || self.procedure_codes.iter().any(|c| c.trim().is_empty()) {
            return fail("procedure_codes");
        }
        if !self.billed_amount.is_positive() {
            return fail("billed_amount");
        }
        Ok(())
    }
}

/// Encodes a claim as an X12 837 interchange
///
/// The segment sequence is fixed: interchange/group/transaction envelope,
/// submitter and receiver identification, billing provider and subscriber
/// hierarchy, claim header (`CLM`), diagnoses (`HI`), service line (`SV2`),
/// service date (`DTP`), then the closing envelope. Diagnosis and procedure
/// codes are joined with the element separator inside their segments.
///
/// Fails with [`EdiError::Encoding`] naming the first missing field when the
/// claim is not submittable.
pub fn encode_837(claim: &Claim837) -> Result<String, EdiError> {
    claim.validate()?;

    let amount = claim.billed_amount.to_edi_string();
    let service_date = claim.service_date.format("%Y%m%d").to_string();
    let diagnosis_refs: Vec<&str> = claim.diagnosis_codes.iter().map(String::as_str).collect();
    let procedure_refs: Vec<&str> = claim.procedure_codes.iter().map(String::as_str).collect();

    let segments = vec![
        // Interchange and functional group envelope
        segment("ISA", &["00", "", "00", "", "ZZ", "SUBMITTER", "ZZ", "RECEIVER", &service_date, "0000", "U", "00501", "000000001", "0", "P", ":"]),
        segment("GS", &["HC", "SUBMITTER", "RECEIVER", &service_date, "0000", "1", "X", "005010X222A1"]),
        segment("ST", &["837", "0001"]),
        segment("BHT", &["0019", "00", &claim.claim_number, &service_date, "0000", "CH"]),
        // Submitter / receiver identification
        segment("NM1", &["41", "2", "SUBMITTER", "", "", "", "", "46", &claim.provider]),
        segment("NM1", &["40", "2", "RECEIVER", "", "", "", "", "46", "CLEARINGHOUSE"]),
        // Billing provider hierarchy
        segment("HL", &["1", "", "20", "1"]),
        segment("NM1", &["85", "2", "BILLING PROVIDER", "", "", "", "", "XX", &claim.provider]),
        // Subscriber hierarchy
        segment("HL", &["2", "1", "22", "0"]),
        segment("SBR", &["P", "18", "", "", "", "", "", "", "CI"]),
        segment("NM1", &["IL", "1", "SUBSCRIBER", "", "", "", "", "MI", &claim.patient]),
        // Claim header, diagnoses, service line, service date
        segment("CLM", &[&claim.claim_number, &amount, "", "", "11:B:1", "Y", "A", "Y", "Y"]),
        segment("HI", &diagnosis_refs),
        segment("SV2", &procedure_refs),
        segment("DTP", &["472", "D8", &service_date]),
        // Closing envelope
        segment("SE", &["14", "0001"]),
        segment("GE", &["1", "1"]),
        segment("IEA", &["1", "000000001"]),
    ];

    Ok(join_segments(&segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn sample_claim() -> Claim837 {
        Claim837 {
            claim_number: "CLM-100".to_string(),
            patient: "PAT-001".to_string(),
            provider: "1234567890".to_string(),
            diagnosis_codes: vec!["F32.9".to_string()],
            procedure_codes: vec!["90834".to_string()],
            billed_amount: Money::new(dec!(150.00), Currency::USD),
            service_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        }
    }

    #[test]
    fn test_encode_contains_required_segments() {
        let text = encode_837(&sample_claim()).unwrap();
        for tag in ["ISA*", "GS*", "ST*837", "BHT*", "CLM*", "HI*", "SV2*", "SE*", "GE*", "IEA*"] {
            assert!(text.contains(tag), "missing {tag} in {text}");
        }
    }

    #[test]
    fn test_clm_carries_claim_number_and_amount() {
        let text = encode_837(&sample_claim()).unwrap();
        assert!(text.contains("CLM*CLM-100*150.00*"));
    }

    #[test]
    fn test_codes_joined_with_element_separator() {
        let mut claim = sample_claim();
        claim.diagnosis_codes = vec!["F32.9".to_string(), "F41.1".to_string()];
        claim.procedure_codes = vec!["90834".to_string(), "90837".to_string()];

        let text = encode_837(&claim).unwrap();
        assert!(text.contains("HI*F32.9*F41.1~"));
        assert!(text.contains("SV2*90834*90837~"));
    }

    #[test]
    fn test_encode_rejects_empty_diagnosis_list() {
        let mut claim = sample_claim();
        claim.diagnosis_codes.clear();
        assert_eq!(
            encode_837(&claim),
            Err(EdiError::encoding("CLM-100", "diagnosis_codes"))
        );
    }

    #[test]
    fn test_encode_rejects_non_positive_amount() {
        let mut claim = sample_claim();
        claim.billed_amount = Money::zero(Currency::USD);
        assert_eq!(
            encode_837(&claim),
            Err(EdiError::encoding("CLM-100", "billed_amount"))
        );
    }

    #[test]
    fn test_encode_rejects_missing_patient() {
        let mut claim = sample_claim();
        claim.patient = "  ".to_string();
        assert_eq!(
            encode_837(&claim),
            Err(EdiError::encoding("CLM-100", "patient"))
        );
    }

    #[test]
    fn test_every_segment_is_terminated() {
        let text = encode_837(&sample_claim()).unwrap();
        assert!(text.ends_with('~'));
        assert_eq!(text.matches('~').count(), 18);
    }
}
