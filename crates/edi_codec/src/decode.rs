//! 835 remittance advice decoding

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::error::EdiError;
use crate::x12::{split_segments, ELEMENT_SEPARATOR};

/// One claim-level adjustment from a CAS segment
///
/// Group codes follow X12 usage: `CO` contractual obligation, `PR` patient
/// responsibility, `OA` other adjustment, `PI` payer initiated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub group: String,
    pub reason_code: String,
    pub amount: Option<Money>,
}

impl Adjustment {
    /// Combined code in the `GROUP-REASON` form used on denial records
    pub fn code(&self) -> String {
        format!("{}-{}", self.group, self.reason_code)
    }
}

/// The reconciliation fields extracted from an 835 payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceData {
    /// Claim number from CLP01
    pub claim_number: String,
    /// Paid amount from CLP03
    pub paid_amount: Money,
    /// Check/reference number from REF*EV
    pub check_number: String,
    /// Payment date from DTM*405, when present
    pub payment_date: Option<NaiveDate>,
    /// CAS adjustments, when present
    pub adjustments: Vec<Adjustment>,
}

/// Decodes an 835 remittance advice
///
/// The payload is split on the segment terminator and each segment on the
/// element separator. Recognized segments:
///
/// - `CLP` — claim number in element 1, paid amount in element 3
/// - `REF` with qualifier `EV` — check/reference number in element 2
/// - `DTM` with qualifier `405` — payment date (`YYYYMMDD`) in element 2
/// - `CAS` — adjustment group, reason code, and amount
///
/// Unrecognized or malformed segments are skipped: payer remittances carry
/// vendor-specific segments outside this subset, and a partial payload is
/// still usable as long as the mandatory fields appear. Decoding fails with
/// [`EdiError::Decoding`] only when claim number, paid amount, or check
/// number is still absent after the full scan — such a payload cannot be
/// reconciled and must never silently produce a zero-amount payment.
pub fn decode_835(raw: &str) -> Result<RemittanceData, EdiError> {
    let mut claim_number: Option<String> = None;
    let mut paid_amount: Option<Money> = None;
    let mut check_number: Option<String> = None;
    let mut payment_date: Option<NaiveDate> = None;
    let mut adjustments: Vec<Adjustment> = Vec::new();

    for seg in split_segments(raw) {
        let elements: Vec<&str> = seg.split(ELEMENT_SEPARATOR).collect();
        match elements[0] {
            "CLP" => {
                if let Some(number) = elements.get(1).filter(|e| !e.is_empty()) {
                    claim_number = Some((*number).to_string());
                }
                if let Some(amount) = elements.get(3).and_then(|e| Money::from_edi_str(e).ok()) {
                    paid_amount = Some(amount);
                }
            }
            "REF" if elements.get(1) == Some(&"EV") => {
                if let Some(number) = elements.get(2).filter(|e| !e.is_empty()) {
                    check_number = Some((*number).to_string());
                }
            }
            "DTM" if elements.get(1) == Some(&"405") => {
                payment_date = elements
                    .get(2)
                    .and_then(|e| NaiveDate::parse_from_str(e, "%Y%m%d").ok());
            }
            "CAS" => {
                if let (Some(group), Some(reason)) = (
                    elements.get(1).filter(|e| !e.is_empty()),
                    elements.get(2).filter(|e| !e.is_empty()),
                ) {
                    adjustments.push(Adjustment {
                        group: (*group).to_string(),
                        reason_code: (*reason).to_string(),
                        amount: elements.get(3).and_then(|e| Money::from_edi_str(e).ok()),
                    });
                }
            }
            _ => {
                // Outside the consumed subset; tolerated by design
                tracing::trace!(tag = elements[0], "skipping unrecognized 835 segment");
            }
        }
    }

    let mut missing = Vec::new();
    if claim_number.is_none() {
        missing.push("claim_number");
    }
    if paid_amount.is_none() {
        missing.push("paid_amount");
    }
    if check_number.is_none() {
        missing.push("check_number");
    }
    if !missing.is_empty() {
        return Err(EdiError::Decoding { missing });
    }

    Ok(RemittanceData {
        claim_number: claim_number.unwrap_or_default(),
        paid_amount: paid_amount.unwrap_or_else(|| Money::zero(Default::default())),
        check_number: check_number.unwrap_or_default(),
        payment_date,
        adjustments,
    })
}
