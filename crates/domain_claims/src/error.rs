//! Billing domain errors

use thiserror::Error;

use edi_codec::EdiError;

use crate::ports::StoreError;

/// Errors that can occur in the billing domain
///
/// The taxonomy separates caller errors (`Encoding`/`Decoding` via [`Edi`],
/// `InvalidState`, `InvalidAmount`) from retryable transport failures, so a
/// caller can distinguish "fix your data" from "try again later".
///
/// [`Edi`]: BillingError::Edi
#[derive(Debug, Error)]
pub enum BillingError {
    /// Claim data insufficient for 837 generation, or an 835 payload
    /// missing mandatory reconciliation fields
    #[error(transparent)]
    Edi(#[from] EdiError),

    /// Clearinghouse unreachable or timed out; safe to retry with the
    /// cached encoded payload
    #[error("Clearinghouse transport failure: {reason}")]
    Transport { reason: String },

    /// Operation attempted from a disallowed lifecycle state
    #[error("{entity} {id}: cannot {operation} in state {state}")]
    InvalidState {
        entity: &'static str,
        id: String,
        state: String,
        operation: &'static str,
    },

    /// Non-positive monetary value where a payment was expected
    #[error("Invalid amount {amount}: must be positive")]
    InvalidAmount { amount: String },

    /// Denial code whose group prefix is not CO/PR/OA/PI and no explicit
    /// category was supplied
    #[error("Unrecognized denial code {code}: unknown adjustment group prefix")]
    UnknownDenialCode { code: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl BillingError {
    pub fn invalid_state(
        entity: &'static str,
        id: impl ToString,
        state: impl ToString,
        operation: &'static str,
    ) -> Self {
        BillingError::InvalidState {
            entity,
            id: id.to_string(),
            state: state.to_string(),
            operation,
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        BillingError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// True when the caller may retry the same operation unchanged
    pub fn is_retryable(&self) -> bool {
        match self {
            BillingError::Transport { .. } => true,
            BillingError::Store(e) => e.is_transient(),
            _ => false,
        }
    }
}
