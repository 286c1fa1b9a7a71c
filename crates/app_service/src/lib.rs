//! Application Service Layer
//!
//! Composition root for the flight claims core: configuration, the tracing
//! bootstrap, the validated submission DTO, the orchestrating
//! [`ClaimService`], in-memory port adapters, and the scheduled refund
//! sweeper binary.
//!
//! The HTTP surface, durable persistence, the payment processor, and
//! notification delivery are external collaborators; this crate wires their
//! ports, it does not implement them.

pub mod config;
pub mod telemetry;
pub mod dto;
pub mod adapters;
pub mod service;
pub mod error;

pub use config::ServiceConfig;
pub use telemetry::init_tracing;
pub use dto::{ClaimSubmission, PASSENGER_REPORT_CONFIDENCE};
pub use adapters::{
    CannedFlightProvider, InMemoryClaimStore, NotificationEvent, RecordingNotifier,
    RecordingPaymentPort, RefundInstruction,
};
pub use service::ClaimService;
pub use error::ServiceError;
