//! Claim lifecycle state machine
//!
//! The transition graph is an explicit table of `(from, to, guard)` triples
//! so it can be tested independently of any call site. Guard failures return
//! a structured list of unmet conditions and leave the claim untouched;
//! re-applying a transition the claim has already taken is a silent no-op.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use airline_directory::{AirlineDirectory, DocumentKind, FollowUpSchedule};

use crate::claim::{Claim, ClaimStatus, RefundRecord};
use crate::error::ClaimError;
use crate::filing::{build_submission_package, FilingMethod};

/// Guard attached to a transition rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Payment captured and identity/flight fields present
    PaymentAndIdentity,
    /// Statutory and per-airline documents attached
    DocumentsComplete,
    /// A valid submission package has been generated
    PackageReady,
    /// Airline reference and filing method recorded
    FilingRecorded,
    /// Advanced by inbound airline correspondence
    CorrespondenceDriven,
    /// Advanced by an operator decision
    OperatorDriven,
    /// A refund record has been accepted for the claim
    RefundAuthorized,
}

/// One allowed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub guard: GuardKind,
}

const fn rule(from: ClaimStatus, to: ClaimStatus, guard: GuardKind) -> TransitionRule {
    TransitionRule { from, to, guard }
}

/// The full transition graph
pub const TRANSITION_TABLE: &[TransitionRule] = &[
    rule(ClaimStatus::Submitted, ClaimStatus::Validated, GuardKind::PaymentAndIdentity),
    rule(ClaimStatus::Validated, ClaimStatus::DocumentsPrepared, GuardKind::DocumentsComplete),
    rule(ClaimStatus::DocumentsPrepared, ClaimStatus::ReadyToFile, GuardKind::PackageReady),
    rule(ClaimStatus::ReadyToFile, ClaimStatus::Filed, GuardKind::FilingRecorded),
    rule(ClaimStatus::Filed, ClaimStatus::AirlineAcknowledged, GuardKind::CorrespondenceDriven),
    rule(ClaimStatus::Filed, ClaimStatus::Monitoring, GuardKind::CorrespondenceDriven),
    rule(ClaimStatus::Filed, ClaimStatus::AirlineResponded, GuardKind::CorrespondenceDriven),
    rule(ClaimStatus::AirlineAcknowledged, ClaimStatus::Monitoring, GuardKind::CorrespondenceDriven),
    rule(ClaimStatus::AirlineAcknowledged, ClaimStatus::AirlineResponded, GuardKind::CorrespondenceDriven),
    rule(ClaimStatus::Monitoring, ClaimStatus::AirlineResponded, GuardKind::CorrespondenceDriven),
    rule(ClaimStatus::AirlineResponded, ClaimStatus::Approved, GuardKind::OperatorDriven),
    rule(ClaimStatus::AirlineResponded, ClaimStatus::Rejected, GuardKind::OperatorDriven),
    rule(ClaimStatus::Approved, ClaimStatus::Completed, GuardKind::OperatorDriven),
    rule(ClaimStatus::Rejected, ClaimStatus::Completed, GuardKind::OperatorDriven),
    // The refund guarantee is a side transition from every state that has
    // not closed out, not part of the forward chain.
    rule(ClaimStatus::Submitted, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::Validated, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::DocumentsPrepared, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::ReadyToFile, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::Filed, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::AirlineAcknowledged, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::Monitoring, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::AirlineResponded, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::Approved, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
    rule(ClaimStatus::Rejected, ClaimStatus::Refunded, GuardKind::RefundAuthorized),
];

/// True if the graph contains a `from -> to` edge
pub fn transition_allowed(from: ClaimStatus, to: ClaimStatus) -> bool {
    TRANSITION_TABLE
        .iter()
        .any(|r| r.from == from && r.to == to)
}

fn rule_for(from: ClaimStatus, to: ClaimStatus) -> Option<&'static TransitionRule> {
    TRANSITION_TABLE
        .iter()
        .find(|r| r.from == from && r.to == to)
}

/// A condition that blocked a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "condition", rename_all = "snake_case")]
pub enum UnmetCondition {
    TransitionNotAllowed {
        from: ClaimStatus,
        to: ClaimStatus,
    },
    PaymentNotCaptured,
    MissingField(String),
    MissingDocument(DocumentKind),
    UnsupportedAirline(String),
    InvalidSubmissionChannel(String),
    PackageNotGenerated,
    AirlineReferenceMissing,
    RefundNotRecorded,
}

/// Structured result of a rejected transition; the claim is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardViolation {
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub unmet: Vec<UnmetCondition>,
}

impl std::fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "transition {:?} -> {:?} blocked by {} unmet condition(s)",
            self.from,
            self.to,
            self.unmet.len()
        )
    }
}

/// Result of an accepted transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied { from: ClaimStatus, to: ClaimStatus },
    /// The claim was already in the requested state; nothing changed
    AlreadyApplied,
}

/// Inbound airline correspondence categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrespondenceKind {
    /// Receipt confirmation, no position on the merits
    Acknowledgement,
    /// Holding reply; the claim stays under watch
    HoldingReply,
    /// Substantive response on the merits
    FinalResponse,
}

impl CorrespondenceKind {
    fn target_status(&self) -> ClaimStatus {
        match self {
            CorrespondenceKind::Acknowledgement => ClaimStatus::AirlineAcknowledged,
            CorrespondenceKind::HoldingReply => ClaimStatus::Monitoring,
            CorrespondenceKind::FinalResponse => ClaimStatus::AirlineResponded,
        }
    }
}

/// The claim lifecycle state machine
///
/// Exclusively owns mutation of claim status and transition timestamps.
/// Callers must serialize invocations per claim (see
/// [`ClaimLockRegistry`](crate::locks::ClaimLockRegistry)).
pub struct ClaimLifecycle {
    directory: Arc<AirlineDirectory>,
}

impl ClaimLifecycle {
    pub fn new(directory: Arc<AirlineDirectory>) -> Self {
        Self { directory }
    }

    /// Requests a transition to `to`, enforcing the graph and its guards
    pub fn transition(
        &self,
        claim: &mut Claim,
        to: ClaimStatus,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        let from = claim.status;
        if from == to {
            return Ok(TransitionOutcome::AlreadyApplied);
        }

        let Some(rule) = rule_for(from, to) else {
            return Err(ClaimError::Guard(GuardViolation {
                from,
                to,
                unmet: vec![UnmetCondition::TransitionNotAllowed { from, to }],
            }));
        };

        let unmet = self.check_guard(claim, rule.guard);
        if !unmet.is_empty() {
            return Err(ClaimError::Guard(GuardViolation { from, to, unmet }));
        }

        claim.status = to;
        claim.status_history.push(crate::claim::StatusTransition { from, to, at: now });
        claim.updated_at = now;
        self.reschedule_follow_up(claim, to, now);
        claim.append_note(
            "lifecycle",
            format!("status changed from {from:?} to {to:?}"),
        );

        info!(claim = %claim.id, ?from, ?to, "claim transitioned");
        Ok(TransitionOutcome::Applied { from, to })
    }

    fn check_guard(&self, claim: &Claim, guard: GuardKind) -> Vec<UnmetCondition> {
        let mut unmet = Vec::new();
        match guard {
            GuardKind::PaymentAndIdentity => {
                match &claim.payment {
                    Some(p) if p.status == crate::claim::PaymentStatus::Captured => {}
                    _ => unmet.push(UnmetCondition::PaymentNotCaptured),
                }
                if claim.passenger.name.trim().is_empty() {
                    unmet.push(UnmetCondition::MissingField("passenger_name".to_string()));
                }
                if !claim.passenger.email.contains('@') {
                    unmet.push(UnmetCondition::MissingField("passenger_email".to_string()));
                }
                if claim.leg.flight.carrier.trim().is_empty()
                    || claim.leg.flight.number.trim().is_empty()
                {
                    unmet.push(UnmetCondition::MissingField("flight_number".to_string()));
                }
            }
            GuardKind::DocumentsComplete => {
                match self.directory.resolve(&claim.leg.flight.carrier) {
                    Some(profile) => {
                        for kind in profile.document_checklist() {
                            if !claim.has_document(kind) {
                                unmet.push(UnmetCondition::MissingDocument(kind));
                            }
                        }
                    }
                    None => unmet.push(UnmetCondition::UnsupportedAirline(
                        claim.leg.flight.carrier.clone(),
                    )),
                }
            }
            GuardKind::PackageReady => {
                if claim.package.is_none() {
                    unmet.push(UnmetCondition::PackageNotGenerated);
                }
            }
            GuardKind::FilingRecorded => {
                if claim.airline_reference.is_none() || claim.filing_method.is_none() {
                    unmet.push(UnmetCondition::AirlineReferenceMissing);
                }
            }
            GuardKind::CorrespondenceDriven | GuardKind::OperatorDriven => {}
            GuardKind::RefundAuthorized => {
                if claim.refund.is_none() {
                    unmet.push(UnmetCondition::RefundNotRecorded);
                }
            }
        }
        unmet
    }

    /// Follow-up bookkeeping for the states that carry it
    fn reschedule_follow_up(&self, claim: &mut Claim, to: ClaimStatus, now: DateTime<Utc>) {
        let schedule = |claim: &Claim| -> FollowUpSchedule {
            self.directory
                .resolve(&claim.leg.flight.carrier)
                .map(|p| p.follow_up.clone())
                .unwrap_or_else(FollowUpSchedule::unconfigured)
        };

        match to {
            ClaimStatus::Filed => {
                claim.filed_at.get_or_insert(now);
                claim.next_follow_up = Some(now + schedule(claim).interval_at(0));
                claim.follow_up_index = 1;
            }
            ClaimStatus::AirlineAcknowledged
            | ClaimStatus::Monitoring
            | ClaimStatus::AirlineResponded => {
                let index = claim.follow_up_index as usize;
                claim.next_follow_up = Some(now + schedule(claim).interval_at(index));
                claim.follow_up_index += 1;
            }
            ClaimStatus::Approved
            | ClaimStatus::Rejected
            | ClaimStatus::Completed
            | ClaimStatus::Refunded => {
                claim.next_follow_up = None;
            }
            _ => {}
        }
    }

    /// `submitted -> validated`
    pub fn validate(
        &self,
        claim: &mut Claim,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        self.transition(claim, ClaimStatus::Validated, now)
    }

    /// `validated -> documents_prepared`
    pub fn mark_documents_prepared(
        &self,
        claim: &mut Claim,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        self.transition(claim, ClaimStatus::DocumentsPrepared, now)
    }

    /// Generates the submission package and advances to `ready_to_file`
    pub fn prepare_package(
        &self,
        claim: &mut Claim,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        let from = claim.status;
        let profile = match self.directory.resolve(&claim.leg.flight.carrier) {
            Some(profile) => profile,
            None => {
                return Err(ClaimError::Guard(GuardViolation {
                    from,
                    to: ClaimStatus::ReadyToFile,
                    unmet: vec![UnmetCondition::UnsupportedAirline(
                        claim.leg.flight.carrier.clone(),
                    )],
                }))
            }
        };

        let package = build_submission_package(claim, profile, now).map_err(|unmet| {
            ClaimError::Guard(GuardViolation {
                from,
                to: ClaimStatus::ReadyToFile,
                unmet,
            })
        })?;

        claim.package = Some(package);
        self.transition(claim, ClaimStatus::ReadyToFile, now)
    }

    /// Records the filing and advances to `filed`, scheduling the first
    /// follow-up from the airline's configured cadence
    pub fn file(
        &self,
        claim: &mut Claim,
        airline_reference: impl Into<String>,
        method: FilingMethod,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        claim.airline_reference = Some(airline_reference.into());
        claim.filing_method = Some(method);
        claim.filed_at = Some(now);
        self.transition(claim, ClaimStatus::Filed, now)
    }

    /// Advances the claim on inbound airline correspondence
    pub fn record_correspondence(
        &self,
        claim: &mut Claim,
        kind: CorrespondenceKind,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        self.transition(claim, kind.target_status(), now)
    }

    pub fn approve(
        &self,
        claim: &mut Claim,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        self.transition(claim, ClaimStatus::Approved, now)
    }

    pub fn reject(
        &self,
        claim: &mut Claim,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        self.transition(claim, ClaimStatus::Rejected, now)
    }

    pub fn complete(
        &self,
        claim: &mut Claim,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        self.transition(claim, ClaimStatus::Completed, now)
    }

    /// Records an accepted refund and takes the side transition
    ///
    /// Idempotent: a claim that already holds a refund record is a no-op.
    pub fn refund(
        &self,
        claim: &mut Claim,
        record: RefundRecord,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, ClaimError> {
        if claim.refund.is_some() || claim.status == ClaimStatus::Refunded {
            return Ok(TransitionOutcome::AlreadyApplied);
        }
        claim.refund = Some(record);
        if let Some(payment) = claim.payment.as_mut() {
            payment.status = crate::claim::PaymentStatus::Refunded;
        }
        self.transition(claim, ClaimStatus::Refunded, now)
    }
}
