//! EDI codec errors

use thiserror::Error;

/// Errors produced by the 837 encoder and 835 decoder
///
/// Every variant names the entity and field/segment involved so an operator
/// can triage a failed payload without re-parsing raw EDI.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdiError {
    /// Claim data insufficient for 837 generation
    #[error("Cannot encode 837 for claim {claim_number}: {field} is missing or invalid")]
    Encoding {
        claim_number: String,
        field: &'static str,
    },

    /// 835 payload missing mandatory reconciliation fields
    #[error("Cannot decode 835: missing mandatory fields [{}]", missing.join(", "))]
    Decoding { missing: Vec<&'static str> },
}

impl EdiError {
    pub fn encoding(claim_number: impl Into<String>, field: &'static str) -> Self {
        EdiError::Encoding {
            claim_number: claim_number.into(),
            field,
        }
    }
}
