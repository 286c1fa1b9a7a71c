//! In-memory adapters
//!
//! Port implementations backed by process memory, used by the test suite
//! and the demo wiring of the sweeper binary. Production deployments swap
//! these for database- and queue-backed adapters without touching the
//! domain crates.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use core_kernel::{ClaimId, DomainPort, Money, PortError};
use domain_claims::{Claim, ClaimStatus, ClaimStore, NotificationPort};
use domain_flight::{FlightDataProvider, FlightObservation};
use domain_refund::{PaymentPort, RefundReason};

/// Claim store over a concurrent in-memory map
#[derive(Debug, Default)]
pub struct InMemoryClaimStore {
    claims: DashMap<ClaimId, Claim>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl DomainPort for InMemoryClaimStore {}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn get(&self, id: ClaimId) -> Result<Claim, PortError> {
        self.claims
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PortError::not_found("Claim", id))
    }

    async fn save(&self, claim: &Claim) -> Result<(), PortError> {
        self.claims.insert(claim.id, claim.clone());
        Ok(())
    }

    async fn by_status(&self, status: ClaimStatus) -> Result<Vec<Claim>, PortError> {
        Ok(self
            .claims
            .iter()
            .filter(|entry| entry.value().status == status)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn open_claims(&self) -> Result<Vec<Claim>, PortError> {
        Ok(self
            .claims
            .iter()
            .filter(|entry| !entry.value().status.is_terminal())
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn follow_ups_due(&self, as_of: DateTime<Utc>) -> Result<Vec<Claim>, PortError> {
        Ok(self
            .claims
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .next_follow_up
                    .is_some_and(|due| due <= as_of)
            })
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn duplicates_of(&self, claim: &Claim) -> Result<Vec<ClaimId>, PortError> {
        Ok(self
            .claims
            .iter()
            .filter(|entry| {
                let other = entry.value();
                other.id != claim.id
                    && other.leg.flight == claim.leg.flight
                    && other.passenger.email.eq_ignore_ascii_case(&claim.passenger.email)
            })
            .map(|entry| entry.value().id)
            .collect())
    }
}

/// A notification event captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    StatusChanged {
        claim_id: ClaimId,
        from: ClaimStatus,
        to: ClaimStatus,
    },
    ClaimFiled {
        claim_id: ClaimId,
        airline_reference: String,
    },
    RefundIssued {
        claim_id: ClaimId,
        amount: Money,
        reason_code: String,
    },
}

/// Notifier that records every emitted event
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("notifier lock poisoned").clone()
    }

    fn record(&self, event: NotificationEvent) {
        debug!(?event, "notification emitted");
        self.events.lock().expect("notifier lock poisoned").push(event);
    }
}

impl DomainPort for RecordingNotifier {}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn claim_status_changed(
        &self,
        claim: &Claim,
        from: ClaimStatus,
        to: ClaimStatus,
    ) -> Result<(), PortError> {
        self.record(NotificationEvent::StatusChanged {
            claim_id: claim.id,
            from,
            to,
        });
        Ok(())
    }

    async fn claim_filed(&self, claim: &Claim, airline_reference: &str) -> Result<(), PortError> {
        self.record(NotificationEvent::ClaimFiled {
            claim_id: claim.id,
            airline_reference: airline_reference.to_string(),
        });
        Ok(())
    }

    async fn refund_issued(
        &self,
        claim: &Claim,
        amount: Money,
        reason_code: &str,
    ) -> Result<(), PortError> {
        self.record(NotificationEvent::RefundIssued {
            claim_id: claim.id,
            amount,
            reason_code: reason_code.to_string(),
        });
        Ok(())
    }
}

/// One refund instruction sent to the processor
#[derive(Debug, Clone, PartialEq)]
pub struct RefundInstruction {
    pub payment_reference: String,
    pub amount: Money,
    pub reason: RefundReason,
}

/// Payment port that records issued refund instructions
#[derive(Debug, Default)]
pub struct RecordingPaymentPort {
    instructions: Mutex<Vec<RefundInstruction>>,
}

impl RecordingPaymentPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> Vec<RefundInstruction> {
        self.instructions
            .lock()
            .expect("payment lock poisoned")
            .clone()
    }
}

impl DomainPort for RecordingPaymentPort {}

#[async_trait]
impl PaymentPort for RecordingPaymentPort {
    async fn issue_refund(
        &self,
        payment_reference: &str,
        amount: Money,
        reason: RefundReason,
    ) -> Result<(), PortError> {
        self.instructions
            .lock()
            .expect("payment lock poisoned")
            .push(RefundInstruction {
                payment_reference: payment_reference.to_string(),
                amount,
                reason,
            });
        Ok(())
    }
}

/// Flight data provider serving canned observations, keyed by flight number
///
/// A flight with no canned observation yields a not-found provider error,
/// which the lookup service degrades to a missing source.
#[derive(Debug, Default)]
pub struct CannedFlightProvider {
    name: String,
    observations: DashMap<String, FlightObservation>,
}

impl CannedFlightProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observations: DashMap::new(),
        }
    }

    pub fn set(&self, flight_number: impl Into<String>, observation: FlightObservation) {
        self.observations
            .insert(flight_number.into().to_ascii_uppercase(), observation);
    }
}

impl DomainPort for CannedFlightProvider {}

#[async_trait]
impl FlightDataProvider for CannedFlightProvider {
    fn source(&self) -> &str {
        &self.name
    }

    async fn lookup(
        &self,
        flight_number: &str,
        _date: chrono::NaiveDate,
    ) -> Result<FlightObservation, PortError> {
        self.observations
            .get(&flight_number.to_ascii_uppercase())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PortError::not_found("FlightObservation", flight_number))
    }
}
