//! Flight domain errors

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the flight data domain
#[derive(Debug, Error)]
pub enum FlightError {
    /// Neither provider returned data; callers must fall back to
    /// user-provided flight facts
    #[error("No flight data available from any provider")]
    NoFlightData,

    #[error("Observations describe different flights: {first} vs {second}")]
    MismatchedObservations { first: String, second: String },

    #[error("Provider error: {0}")]
    Provider(#[from] PortError),
}
