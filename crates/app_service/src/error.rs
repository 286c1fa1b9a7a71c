//! Service-level errors

use thiserror::Error;

use core_kernel::PortError;
use domain_claims::ClaimError;
use domain_eligibility::EligibilityError;
use domain_flight::FlightError;
use domain_refund::RefundError;

/// Errors surfaced by the orchestration layer
///
/// Guard violations and validation misses are expected business conditions
/// carried through as typed values; only store/adapter faults are opaque.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid submission: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    #[error(transparent)]
    Flight(#[from] FlightError),

    #[error(transparent)]
    Refund(#[from] RefundError),

    #[error("Record store error: {0}")]
    Store(#[from] PortError),
}

impl ServiceError {
    /// Returns the guard violation when this wraps one
    pub fn as_guard(&self) -> Option<&domain_claims::GuardViolation> {
        match self {
            ServiceError::Claim(err) => err.as_guard(),
            _ => None,
        }
    }
}
