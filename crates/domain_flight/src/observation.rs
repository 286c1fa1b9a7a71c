//! Provider flight observations

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::temporal::delay_minutes;

/// Identifies one operated flight leg: carrier, number, and date of operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlightDesignator {
    /// Operating carrier code, e.g. "LH"
    pub carrier: String,
    /// Flight number without the carrier prefix, e.g. "1234"
    pub number: String,
    /// Scheduled date of operation (departure-local)
    pub date: NaiveDate,
}

impl FlightDesignator {
    pub fn new(carrier: impl Into<String>, number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            carrier: carrier.into(),
            number: number.into(),
            date,
        }
    }

    /// Full flight number as displayed, e.g. "LH1234"
    pub fn full_number(&self) -> String {
        format!("{}{}", self.carrier, self.number)
    }
}

impl fmt::Display for FlightDesignator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} on {}", self.carrier, self.number, self.date)
    }
}

/// One provider's report of a flight
///
/// Immutable once received; a fresh observation is created per lookup call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightObservation {
    pub flight: FlightDesignator,
    pub scheduled_departure: Option<DateTime<Utc>>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: Option<DateTime<Utc>>,
    pub actual_arrival: Option<DateTime<Utc>>,
    /// Delay at the final destination in minutes, as reported by the provider
    pub delay_minutes: i64,
    pub cancelled: bool,
    /// Provider-reported reason for the delay or cancellation
    pub status_reason: Option<String>,
    /// Provider-assigned confidence in [0, 1]
    pub confidence: f64,
    /// Which provider produced this observation
    pub source: String,
    pub observed_at: DateTime<Utc>,
}

impl FlightObservation {
    /// Creates an observation, clamping confidence into [0, 1]
    pub fn new(
        flight: FlightDesignator,
        delay_minutes: i64,
        cancelled: bool,
        confidence: f64,
        source: impl Into<String>,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            flight,
            scheduled_departure: None,
            actual_departure: None,
            scheduled_arrival: None,
            actual_arrival: None,
            delay_minutes,
            cancelled,
            status_reason: None,
            confidence: confidence.clamp(0.0, 1.0),
            source: source.into(),
            observed_at,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.status_reason = Some(reason.into());
        self
    }

    pub fn with_arrival_times(
        mut self,
        scheduled: DateTime<Utc>,
        actual: DateTime<Utc>,
    ) -> Self {
        self.scheduled_arrival = Some(scheduled);
        self.actual_arrival = Some(actual);
        self
    }

    /// Arrival delay derived from the timestamps when both are present,
    /// falling back to the provider-reported figure.
    pub fn effective_delay_minutes(&self) -> i64 {
        match (self.scheduled_arrival, self.actual_arrival) {
            (Some(scheduled), Some(actual)) => delay_minutes(scheduled, actual),
            _ => self.delay_minutes,
        }
    }
}
