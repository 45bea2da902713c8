//! Per-claim async lock registry
//!
//! Submission and remittance processing both mutate claim state; the
//! registry serializes work on a single claim while letting different
//! claims proceed in parallel.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use core_kernel::ClaimId;

/// Shared registry of per-claim locks
///
/// Entries are created on first use and kept for the life of the process;
/// the per-entry cost is one Arc'd mutex.
#[derive(Default)]
pub struct ClaimLocks {
    locks: Mutex<HashMap<ClaimId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ClaimLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for a claim, waiting if another task holds it
    pub async fn acquire(&self, claim_id: ClaimId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self
                .locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(claim_id).or_default())
        };
        lock.lock_owned().await
    }
}
