//! Per-claim transition serialization
//!
//! Concurrent operator actions, webhook deliveries, and sweep passes on the
//! same claim must not race on the status field. The registry hands out one
//! async mutex per claim id; holders get at-most-one in-flight transition
//! per claim while claims stay independent of each other.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use core_kernel::ClaimId;

/// Registry of per-claim async mutexes
#[derive(Debug, Default)]
pub struct ClaimLockRegistry {
    locks: DashMap<ClaimId, Arc<Mutex<()>>>,
}

impl ClaimLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mutex for a claim, creating it on first use
    pub fn lock_for(&self, claim_id: ClaimId) -> Arc<Mutex<()>> {
        self.locks
            .entry(claim_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drops the mutex for a claim that reached a terminal state
    pub fn release(&self, claim_id: ClaimId) {
        self.locks.remove(&claim_id);
    }
}
