//! Test Utilities Crate
//!
//! Shared test infrastructure for the claims billing test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
