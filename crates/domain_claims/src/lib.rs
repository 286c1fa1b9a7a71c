//! Claims Management Domain
//!
//! This crate implements the claim lifecycle from passenger submission
//! through validation, document preparation, airline filing, follow-up, and
//! terminal outcomes.
//!
//! # Claim Lifecycle
//!
//! ```text
//! submitted -> validated -> documents_prepared -> ready_to_file -> filed
//!   -> airline_acknowledged -> monitoring -> airline_responded
//!   -> approved/rejected -> completed
//! ```
//!
//! `refunded` is a side transition reachable from any non-terminal state and
//! admits no further transitions.

pub mod claim;
pub mod lifecycle;
pub mod filing;
pub mod locks;
pub mod ports;
pub mod error;

pub use claim::{
    Claim, ClaimDocument, ClaimNote, ClaimStatus, CompensationOverride, FlightLeg, Passenger,
    PaymentInfo, PaymentStatus, RefundRecord, StatusTransition,
};
pub use lifecycle::{
    transition_allowed, ClaimLifecycle, CorrespondenceKind, GuardViolation, TransitionOutcome,
    TransitionRule, UnmetCondition, TRANSITION_TABLE,
};
pub use filing::{build_submission_package, FilingMethod, SubmissionPackage};
pub use locks::ClaimLockRegistry;
pub use ports::{ClaimStore, NotificationPort};
pub use error::ClaimError;
