//! Request handlers

pub mod claims;
pub mod eras;
pub mod health;
