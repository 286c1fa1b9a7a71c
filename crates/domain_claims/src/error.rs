//! Claims domain errors

use thiserror::Error;

use crate::lifecycle::GuardViolation;

/// Errors that can occur in the claims domain
///
/// Guard violations carry the specific unmet conditions so callers can
/// remediate and retry; they are expected business conditions, not faults.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("{0}")]
    Guard(GuardViolation),

    #[error("Claim already closed")]
    ClaimClosed,
}

impl ClaimError {
    /// Returns the guard violation when the error is one
    pub fn as_guard(&self) -> Option<&GuardViolation> {
        match self {
            ClaimError::Guard(violation) => Some(violation),
            _ => None,
        }
    }
}
