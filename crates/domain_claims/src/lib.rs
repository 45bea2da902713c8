//! Claims Billing Domain
//!
//! This crate implements the claim billing lifecycle: 837 generation and
//! clearinghouse submission, 835 remittance processing, payment
//! reconciliation, and denial management.
//!
//! # Claim Lifecycle
//!
//! ```text
//! draft -> submitted -> accepted -> paid
//!                    \> rejected \> denied
//! ```
//!
//! `rejected`, `paid`, and `denied` are terminal for a claim instance;
//! resubmission after a rejection or denial creates a new claim.

pub mod claim;
pub mod era;
pub mod payment;
pub mod denial;
pub mod error;
pub mod ports;
pub mod gateway;
pub mod locks;
pub mod lifecycle;
pub mod reconciler;
pub mod remittance;

pub use claim::{Claim, ClaimStatus, NewClaim};
pub use era::{RemittanceAdvice, EraStatus};
pub use payment::{Payment, PaymentStatus};
pub use denial::{Denial, DenialCategory, DenialManager, AppealPolicy};
pub use error::BillingError;
pub use ports::{ClaimsStore, StoreError};
pub use gateway::{ClearinghouseGateway, SubmissionOutcome, GatewayError, SimulatedGateway, GatewayBehavior};
pub use locks::ClaimLocks;
pub use lifecycle::ClaimLifecycle;
pub use reconciler::PaymentReconciler;
pub use remittance::RemittanceProcessor;
