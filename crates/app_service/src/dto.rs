//! Claim submission DTO
//!
//! The validated boundary between the form/parser surface and the domain.
//! Validation misses come back as a structured field-level error set, never
//! a generic failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use domain_claims::{Claim, FlightLeg, Passenger};
use domain_eligibility::{DisruptionInput, Route};
use domain_flight::{FlightDesignator, FlightObservation, ReconciledFlightRecord};

/// Confidence assigned to passenger-reported flight facts when no provider
/// returned data
pub const PASSENGER_REPORT_CONFIDENCE: f64 = 0.4;

/// A passenger's claim submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClaimSubmission {
    #[validate(length(min = 1, message = "passenger name is required"))]
    pub passenger_name: String,
    #[validate(email(message = "a valid email address is required"))]
    pub passenger_email: String,

    /// Operating carrier code, e.g. "LH"
    #[validate(length(min = 2, max = 3, message = "carrier code must be 2 or 3 characters"))]
    pub carrier: String,
    #[validate(length(min = 1, message = "flight number is required"))]
    pub flight_number: String,
    pub flight_date: NaiveDate,

    /// Origin airport, IATA code
    #[validate(length(equal = 3, message = "origin must be an IATA airport code"))]
    pub origin: String,
    /// Destination airport, IATA code
    #[validate(length(equal = 3, message = "destination must be an IATA airport code"))]
    pub destination: String,

    /// Departure country, ISO 3166-1 alpha-2
    #[validate(length(equal = 2, message = "origin country must be an ISO country code"))]
    pub origin_country: String,
    /// Arrival country, ISO 3166-1 alpha-2
    #[validate(length(equal = 2, message = "destination country must be an ISO country code"))]
    pub destination_country: String,
    /// Country the operating carrier is licensed in
    #[validate(length(equal = 2, message = "carrier country must be an ISO country code"))]
    pub carrier_country: String,
    /// Great-circle distance of the whole journey in kilometers
    #[validate(range(min = 1.0, message = "journey distance must be positive"))]
    pub distance_km: f64,

    pub booking_reference: Option<String>,

    /// What happened, with the type-specific facts
    pub disruption: DisruptionInput,

    /// Passenger-reported delay, used when no provider returns data
    pub reported_delay_minutes: i64,
    /// Passenger-reported cancellation flag
    pub reported_cancelled: bool,
    /// Disruption reason as told to the passenger, if any
    pub disruption_reason: Option<String>,
}

impl ClaimSubmission {
    pub fn passenger(&self) -> Passenger {
        Passenger {
            name: self.passenger_name.trim().to_string(),
            email: self.passenger_email.trim().to_string(),
        }
    }

    pub fn designator(&self) -> FlightDesignator {
        FlightDesignator::new(
            self.carrier.trim().to_ascii_uppercase(),
            self.flight_number.trim(),
            self.flight_date,
        )
    }

    /// Full display flight number, e.g. "LH1234"
    pub fn full_flight_number(&self) -> String {
        self.designator().full_number()
    }

    pub fn route(&self) -> Route {
        Route::new(
            self.origin_country.to_ascii_uppercase(),
            self.destination_country.to_ascii_uppercase(),
            self.carrier_country.to_ascii_uppercase(),
            self.distance_km,
        )
    }

    pub fn leg(&self) -> FlightLeg {
        FlightLeg {
            flight: self.designator(),
            origin: self.origin.to_ascii_uppercase(),
            destination: self.destination.to_ascii_uppercase(),
            route: self.route(),
        }
    }

    /// Builds the fallback observation from passenger-reported facts,
    /// used when neither provider returns data
    pub fn fallback_observation(&self, now: DateTime<Utc>) -> FlightObservation {
        let mut obs = FlightObservation::new(
            self.designator(),
            self.reported_delay_minutes,
            self.reported_cancelled,
            PASSENGER_REPORT_CONFIDENCE,
            "passenger_report",
            now,
        );
        if let Some(reason) = &self.disruption_reason {
            obs = obs.with_reason(reason.clone());
        }
        obs
    }

    /// Creates the claim aggregate from this submission
    pub fn into_claim(
        self,
        flight_record: Option<ReconciledFlightRecord>,
        now: DateTime<Utc>,
    ) -> Claim {
        let mut claim = Claim::submitted(self.passenger(), self.leg(), self.disruption.clone(), now);
        claim.booking_reference = self
            .booking_reference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        claim.flight_record = flight_record;
        claim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> ClaimSubmission {
        ClaimSubmission {
            passenger_name: "Ada Lovelace".to_string(),
            passenger_email: "ada@example.com".to_string(),
            carrier: "LH".to_string(),
            flight_number: "1234".to_string(),
            flight_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            origin: "FRA".to_string(),
            destination: "MAD".to_string(),
            origin_country: "DE".to_string(),
            destination_country: "ES".to_string(),
            carrier_country: "DE".to_string(),
            distance_km: 1_600.0,
            booking_reference: Some("ABC123".to_string()),
            disruption: DisruptionInput::Delay,
            reported_delay_minutes: 200,
            reported_cancelled: false,
            disruption_reason: Some("technical fault".to_string()),
        }
    }

    #[test]
    fn test_valid_submission_passes() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn test_invalid_email_is_a_field_error() {
        let mut bad = submission();
        bad.passenger_email = "not-an-email".to_string();

        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("passenger_email"));
    }

    #[test]
    fn test_fallback_observation_carries_reported_facts() {
        let obs = submission().fallback_observation(Utc::now());
        assert_eq!(obs.delay_minutes, 200);
        assert_eq!(obs.source, "passenger_report");
        assert_eq!(obs.confidence, PASSENGER_REPORT_CONFIDENCE);
        assert_eq!(obs.status_reason.as_deref(), Some("technical fault"));
    }

    #[test]
    fn test_into_claim_normalizes_fields() {
        let mut sub = submission();
        sub.booking_reference = Some("  ".to_string());
        let claim = sub.into_claim(None, Utc::now());

        assert_eq!(claim.leg.flight.full_number(), "LH1234");
        assert!(claim.booking_reference.is_none());
    }
}
