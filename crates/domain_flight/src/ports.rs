//! Flight data provider port
//!
//! Each third-party flight-status provider is an adapter behind this trait.
//! Production wiring queries two independent providers; tests plug in mocks.

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{DomainPort, PortError};

use crate::observation::FlightObservation;

/// A third-party flight-status source
#[async_trait]
pub trait FlightDataProvider: DomainPort {
    /// Stable identifier for this provider, recorded on observations
    fn source(&self) -> &str;

    /// Fetches one observation for the given flight and date
    ///
    /// `flight_number` is the full display form, e.g. "LH1234".
    async fn lookup(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> Result<FlightObservation, PortError>;
}
