//! Refund domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur while enforcing the refund guarantee
#[derive(Debug, Error)]
pub enum RefundError {
    #[error("Claim store error: {0}")]
    Store(#[from] PortError),
}
