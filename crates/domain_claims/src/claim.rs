//! Claim aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use airline_directory::DocumentKind;
use core_kernel::{ClaimId, DocumentId, Money, NoteId, RefundId};
use domain_eligibility::{DisruptionInput, DisruptionType, EligibilityDecision, Route};
use domain_flight::{FlightDesignator, ReconciledFlightRecord};

/// Claim status
///
/// Owned exclusively by the lifecycle state machine; other components read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Submitted by the passenger, payment pending or just captured
    Submitted,
    /// Payment captured and identity/flight fields verified
    Validated,
    /// Required documents attached
    DocumentsPrepared,
    /// Submission package generated and addressed
    ReadyToFile,
    /// Filed with the airline
    Filed,
    /// Airline confirmed receipt
    AirlineAcknowledged,
    /// Awaiting a substantive airline response
    Monitoring,
    /// Airline responded on the merits
    AirlineResponded,
    /// Airline approved compensation
    Approved,
    /// Airline rejected the claim
    Rejected,
    /// Compensation paid out and the claim closed
    Completed,
    /// Service fee refunded under the guarantee; no further transitions
    Refunded,
}

impl ClaimStatus {
    /// Terminal states admit no further transitions except the
    /// approved/rejected close-out to completed
    pub fn is_terminal(&self) -> bool {
        matches!(self, ClaimStatus::Completed | ClaimStatus::Refunded)
    }
}

/// Passenger identity on the claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub email: String,
}

/// The disrupted flight leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub flight: FlightDesignator,
    /// Origin airport, IATA code
    pub origin: String,
    /// Destination airport, IATA code
    pub destination: String,
    /// Jurisdictional route facts used for eligibility
    pub route: Route,
}

/// Payment state mirrored from the payment processor signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Captured,
    Refunded,
}

/// The captured service-fee payment backing the claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Payment-processor reference
    pub reference: String,
    pub amount: Money,
    pub status: PaymentStatus,
    pub captured_at: DateTime<Utc>,
}

/// One taken status transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: ClaimStatus,
    pub to: ClaimStatus,
    pub at: DateTime<Utc>,
}

/// Append-only internal note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimNote {
    pub id: NoteId,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// An attached supporting document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimDocument {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub file_name: String,
    pub attached_at: DateTime<Utc>,
}

/// An admin-recorded compensation override
///
/// Kept beside the engine-computed estimate, never merged into it; a
/// re-quote always re-runs the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationOverride {
    pub amount: Money,
    pub approved_by: String,
    pub rationale: String,
    pub recorded_at: DateTime<Utc>,
}

/// The accepted refund of the service fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundRecord {
    pub id: RefundId,
    pub amount: Money,
    /// Trigger reason code, e.g. "not_filed_in_time"
    pub reason_code: String,
    pub issued_at: DateTime<Utc>,
}

/// The central claim entity
///
/// Created when a passenger submits a claim; destroyed only by data
/// retention policy. Refunded and completed claims remain as history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub claim_number: String,
    pub passenger: Passenger,
    pub leg: FlightLeg,
    pub disruption: DisruptionInput,
    /// Reconciled flight facts, when a provider lookup succeeded
    pub flight_record: Option<ReconciledFlightRecord>,
    pub status: ClaimStatus,
    pub status_history: Vec<StatusTransition>,
    /// Booking reference, required by some airlines before filing
    pub booking_reference: Option<String>,
    pub payment: Option<PaymentInfo>,
    /// Engine-computed compensation estimate for the current inputs
    pub compensation_estimate: Option<EligibilityDecision>,
    /// Post-payment re-evaluation, when one was run
    pub reassessment: Option<EligibilityDecision>,
    pub overrides: Vec<CompensationOverride>,
    pub documents: Vec<ClaimDocument>,
    pub package: Option<crate::filing::SubmissionPackage>,
    /// Airline's reference for the filed claim
    pub airline_reference: Option<String>,
    pub filing_method: Option<crate::filing::FilingMethod>,
    pub filed_at: Option<DateTime<Utc>>,
    /// Position in the airline's follow-up schedule for the next advance
    pub follow_up_index: u32,
    pub next_follow_up: Option<DateTime<Utc>>,
    /// When the passenger explicitly asked for their money back
    pub refund_requested_at: Option<DateTime<Utc>>,
    /// Earlier claim for the same flight and passenger, if detected
    pub duplicate_of: Option<ClaimId>,
    pub refund: Option<RefundRecord>,
    pub notes: Vec<ClaimNote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a newly submitted claim
    pub fn submitted(
        passenger: Passenger,
        leg: FlightLeg,
        disruption: DisruptionInput,
        now: DateTime<Utc>,
    ) -> Self {
        let id = ClaimId::new_v7();
        Self {
            id,
            claim_number: generate_claim_number(),
            passenger,
            leg,
            disruption,
            flight_record: None,
            status: ClaimStatus::Submitted,
            status_history: Vec::new(),
            booking_reference: None,
            payment: None,
            compensation_estimate: None,
            reassessment: None,
            overrides: Vec::new(),
            documents: Vec::new(),
            package: None,
            airline_reference: None,
            filing_method: None,
            filed_at: None,
            follow_up_index: 0,
            next_follow_up: None,
            refund_requested_at: None,
            duplicate_of: None,
            refund: None,
            notes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn disruption_type(&self) -> DisruptionType {
        self.disruption.disruption_type()
    }

    /// True if the claim is or has ever been in the given status
    pub fn has_reached(&self, status: ClaimStatus) -> bool {
        self.status == status
            || status == ClaimStatus::Submitted
            || self
                .status_history
                .iter()
                .any(|t| t.to == status || t.from == status)
    }

    /// Records the captured service-fee payment
    pub fn record_payment(&mut self, payment: PaymentInfo) {
        self.payment = Some(payment);
        self.updated_at = Utc::now();
    }

    /// Attaches a supporting document
    pub fn attach_document(&mut self, kind: DocumentKind, file_name: impl Into<String>) {
        self.documents.push(ClaimDocument {
            id: DocumentId::new_v7(),
            kind,
            file_name: file_name.into(),
            attached_at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    pub fn has_document(&self, kind: DocumentKind) -> bool {
        self.documents.iter().any(|d| d.kind == kind)
    }

    /// Appends to the internal note log
    pub fn append_note(&mut self, author: impl Into<String>, body: impl Into<String>) {
        self.notes.push(ClaimNote {
            id: NoteId::new_v7(),
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// Records an admin compensation override beside the computed estimate
    pub fn record_override(&mut self, value: CompensationOverride) {
        self.overrides.push(value);
        self.updated_at = Utc::now();
    }

    /// True when the named airline-required field is populated
    pub fn field_present(&self, field: &str) -> bool {
        match field {
            "booking_reference" => self.booking_reference.is_some(),
            "passenger_name" => !self.passenger.name.trim().is_empty(),
            "passenger_email" => !self.passenger.email.trim().is_empty(),
            _ => false,
        }
    }
}

fn generate_claim_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("FLC-{}", duration.as_millis() % 10_000_000_000)
}
