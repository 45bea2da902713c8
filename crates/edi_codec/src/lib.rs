//! X12 EDI Codec
//!
//! Pure, stateless encoding and decoding for the subset of X12 the billing
//! pipeline exchanges with clearinghouses and payers:
//!
//! - **837 professional claim** — [`encode_837`] renders a claim as a fixed
//!   sequence of segments.
//! - **835 remittance advice** — [`decode_835`] scans a payer remittance for
//!   the fields needed to reconcile a payment against a claim.
//!
//! Nothing in this crate performs I/O, so the exact same functions validate
//! a payload before any state change is committed.

pub mod error;
pub mod x12;
pub mod encode;
pub mod decode;

pub use error::EdiError;
pub use encode::{encode_837, Claim837};
pub use decode::{decode_835, RemittanceData, Adjustment};
pub use x12::{SEGMENT_TERMINATOR, ELEMENT_SEPARATOR};
