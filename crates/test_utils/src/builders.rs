//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::{DateTime, NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use airline_directory::DocumentKind;
use core_kernel::Money;
use domain_claims::{Claim, FlightLeg, Passenger, PaymentInfo, PaymentStatus};
use domain_eligibility::{DisruptionInput, Route};
use domain_flight::{FlightDesignator, FlightObservation, ReconciledFlightRecord};

use crate::fixtures::{ClaimFixtures, FlightFixtures, MoneyFixtures, RouteFixtures, TemporalFixtures};

/// A randomly generated passenger for tests that need distinct identities
pub fn fake_passenger() -> Passenger {
    Passenger {
        name: Name().fake(),
        email: SafeEmail().fake(),
    }
}

/// Builder for constructing test claims
pub struct ClaimBuilder {
    passenger: Passenger,
    flight: FlightDesignator,
    origin: String,
    destination: String,
    route: Route,
    disruption: DisruptionInput,
    booking_reference: Option<String>,
    payment: Option<PaymentInfo>,
    flight_record: Option<ReconciledFlightRecord>,
    documents: Vec<(DocumentKind, String)>,
    created_at: DateTime<Utc>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a new builder with the standard fixture defaults
    pub fn new() -> Self {
        Self {
            passenger: ClaimFixtures::passenger(),
            flight: FlightFixtures::designator(),
            origin: "FRA".to_string(),
            destination: "MAD".to_string(),
            route: RouteFixtures::eu_medium_haul(),
            disruption: DisruptionInput::Delay,
            booking_reference: Some("ABC123".to_string()),
            payment: None,
            flight_record: None,
            documents: Vec::new(),
            created_at: TemporalFixtures::now(),
        }
    }

    /// Sets the passenger
    pub fn with_passenger(mut self, passenger: Passenger) -> Self {
        self.passenger = passenger;
        self
    }

    /// Sets the flight designator
    pub fn with_flight(
        mut self,
        carrier: impl Into<String>,
        number: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        self.flight = FlightDesignator::new(carrier, number, date);
        self
    }

    /// Sets the origin and destination airports
    pub fn with_airports(
        mut self,
        origin: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        self.origin = origin.into();
        self.destination = destination.into();
        self
    }

    /// Sets the jurisdictional route
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    /// Sets the disruption input
    pub fn with_disruption(mut self, disruption: DisruptionInput) -> Self {
        self.disruption = disruption;
        self
    }

    /// Sets the booking reference (pass `None` to test its absence)
    pub fn with_booking_reference(mut self, reference: Option<String>) -> Self {
        self.booking_reference = reference;
        self
    }

    /// Records a captured payment with the given amount
    pub fn paid(mut self, amount: Money, captured_at: DateTime<Utc>) -> Self {
        self.payment = Some(PaymentInfo {
            reference: "pay_789".to_string(),
            amount,
            status: PaymentStatus::Captured,
            captured_at,
        });
        self
    }

    /// Records the standard captured service fee
    pub fn paid_standard_fee(self) -> Self {
        self.paid(
            MoneyFixtures::service_fee(),
            TemporalFixtures::payment_captured_at(),
        )
    }

    /// Embeds a reconciled flight record
    pub fn with_flight_record(mut self, record: ReconciledFlightRecord) -> Self {
        self.flight_record = Some(record);
        self
    }

    /// Attaches a document
    pub fn with_document(mut self, kind: DocumentKind, file_name: impl Into<String>) -> Self {
        self.documents.push((kind, file_name.into()));
        self
    }

    /// Attaches the statutory baseline documents plus a booking confirmation
    pub fn with_standard_documents(self) -> Self {
        self.with_document(DocumentKind::BoardingPass, "boarding_pass.pdf")
            .with_document(DocumentKind::DisruptionProof, "delay_confirmation.pdf")
            .with_document(DocumentKind::BookingConfirmation, "booking.pdf")
    }

    /// Builds the claim
    pub fn build(self) -> Claim {
        let mut claim = Claim::submitted(
            self.passenger,
            FlightLeg {
                flight: self.flight,
                origin: self.origin,
                destination: self.destination,
                route: self.route,
            },
            self.disruption,
            self.created_at,
        );
        claim.booking_reference = self.booking_reference;
        claim.flight_record = self.flight_record;
        if let Some(payment) = self.payment {
            claim.record_payment(payment);
        }
        for (kind, file_name) in self.documents {
            claim.attach_document(kind, file_name);
        }
        claim
    }
}

/// Builder for constructing provider observations
pub struct ObservationBuilder {
    flight: FlightDesignator,
    delay_minutes: i64,
    cancelled: bool,
    confidence: f64,
    source: String,
    status_reason: Option<String>,
    arrival_times: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Default for ObservationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservationBuilder {
    /// Creates a new builder reporting an on-time flight
    pub fn new() -> Self {
        Self {
            flight: FlightFixtures::designator(),
            delay_minutes: 0,
            cancelled: false,
            confidence: 0.9,
            source: "primary".to_string(),
            status_reason: None,
            arrival_times: None,
        }
    }

    /// Sets the reported delay
    pub fn with_delay(mut self, minutes: i64) -> Self {
        self.delay_minutes = minutes;
        self
    }

    /// Marks the flight as cancelled
    pub fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }

    /// Sets the provider confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Sets the provider source tag
    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Sets the reported disruption reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.status_reason = Some(reason.into());
        self
    }

    /// Sets the scheduled and actual arrival timestamps
    pub fn with_arrival_times(mut self, scheduled: DateTime<Utc>, actual: DateTime<Utc>) -> Self {
        self.arrival_times = Some((scheduled, actual));
        self
    }

    /// Builds the observation
    pub fn build(self) -> FlightObservation {
        let mut obs = FlightObservation::new(
            self.flight,
            self.delay_minutes,
            self.cancelled,
            self.confidence,
            self.source,
            TemporalFixtures::now(),
        );
        if let Some(reason) = self.status_reason {
            obs = obs.with_reason(reason);
        }
        if let Some((scheduled, actual)) = self.arrival_times {
            obs = obs.with_arrival_times(scheduled, actual);
        }
        obs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::ClaimStatus;

    #[test]
    fn test_claim_builder_defaults() {
        let claim = ClaimBuilder::new().build();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert_eq!(claim.leg.origin, "FRA");
        assert!(claim.payment.is_none());
        assert!(claim.documents.is_empty());
    }

    #[test]
    fn test_claim_builder_paid_with_documents() {
        let claim = ClaimBuilder::new()
            .paid_standard_fee()
            .with_standard_documents()
            .build();

        assert!(claim.payment.is_some());
        assert!(claim.has_document(DocumentKind::BoardingPass));
        assert!(claim.has_document(DocumentKind::BookingConfirmation));
    }

    #[test]
    fn test_observation_builder() {
        let obs = ObservationBuilder::new()
            .with_delay(200)
            .with_confidence(0.7)
            .from_source("secondary")
            .with_reason("technical fault")
            .build();

        assert_eq!(obs.delay_minutes, 200);
        assert_eq!(obs.source, "secondary");
        assert_eq!(obs.status_reason.as_deref(), Some("technical fault"));
    }

    #[test]
    fn test_fake_passenger_has_identity() {
        let passenger = fake_passenger();
        assert!(!passenger.name.is_empty());
        assert!(passenger.email.contains('@'));
    }
}
