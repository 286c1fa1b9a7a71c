//! Refund Guarantee Domain
//!
//! The service's "pay upfront, guaranteed refund" promise is enforced here:
//! the trigger evaluator decides whether a claim owes the passenger their
//! service fee back, and the sweep runs that decision across all open claims
//! on a schedule so time-based triggers fire even when nothing else happens
//! to a claim.

pub mod evaluator;
pub mod sweep;
pub mod ports;
pub mod error;

pub use evaluator::{RefundDecision, RefundReason, RefundTriggerEvaluator};
pub use sweep::{apply_refund, run_refund_sweep, SweepReport};
pub use ports::PaymentPort;
pub use error::RefundError;
