//! Claims Domain Ports
//!
//! The record store and the notifier are external collaborators. The core
//! only specifies what it reads and writes; storage technology and delivery
//! mechanics live behind these traits (database adapters in production,
//! in-memory adapters in tests).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{ClaimId, DomainPort, Money, PortError};

use crate::claim::{Claim, ClaimStatus};

/// Claim record store
#[async_trait]
pub trait ClaimStore: DomainPort {
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Creates or replaces the claim record
    async fn save(&self, claim: &Claim) -> Result<(), PortError>;

    /// Claims currently in the given status
    async fn by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError>;

    /// Claims in any non-terminal status (the sweep population)
    async fn open_claims(&self) -> Result<Vec<Claim>, PortError>;

    /// Claims whose next follow-up is due at or before the given instant
    async fn follow_ups_due(&self, as_of: DateTime<Utc>) -> Result<Vec<Claim>, PortError>;

    /// Other claims for the same flight leg and passenger email
    async fn duplicates_of(&self, claim: &Claim) -> Result<Vec<ClaimId>, PortError>;
}

/// Abstract notification events; rendering and delivery are external
#[async_trait]
pub trait NotificationPort: DomainPort {
    async fn claim_status_changed(
        &self,
        claim: &Claim,
        from: ClaimStatus,
        to: ClaimStatus,
    ) -> Result<(), PortError>;

    async fn claim_filed(&self, claim: &Claim, airline_reference: &str) -> Result<(), PortError>;

    async fn refund_issued(
        &self,
        claim: &Claim,
        amount: Money,
        reason_code: &str,
    ) -> Result<(), PortError>;
}
