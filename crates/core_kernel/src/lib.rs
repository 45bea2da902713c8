//! Core Kernel - Foundational types for the claims billing system
//!
//! This crate provides the fundamental building blocks used across the
//! billing pipeline:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers for claims, remittances, and payments

pub mod money;
pub mod identifiers;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{
    ClaimId, EraId, PaymentId, DenialId,
    PatientId, ProviderId, PayerId,
};
