//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the flight
//! claims system. These fixtures are designed to be consistent and
//! predictable for unit tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};
use domain_claims::{Claim, FlightLeg, Passenger, PaymentInfo, PaymentStatus};
use domain_eligibility::{DisruptionInput, Route};
use domain_flight::{reconcile, FlightDesignator, FlightObservation, ReconciledFlightRecord};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Short-haul EU261 compensation amount
    pub fn eur_250() -> Money {
        Money::new(dec!(250.00), Currency::EUR)
    }

    /// Medium-haul EU261 compensation amount
    pub fn eur_400() -> Money {
        Money::new(dec!(400.00), Currency::EUR)
    }

    /// Long-haul EU261 compensation amount
    pub fn eur_600() -> Money {
        Money::new(dec!(600.00), Currency::EUR)
    }

    /// The service fee a passenger pays up front
    pub fn service_fee() -> Money {
        Money::new(dec!(29.00), Currency::EUR)
    }

    /// A medium-haul ticket price for downgrade scenarios
    pub fn ticket_price_800() -> Money {
        Money::new(dec!(800.00), Currency::EUR)
    }

    /// A one-way fare for US DOT denied-boarding scenarios
    pub fn usd_fare_300() -> Money {
        Money::new(dec!(300.00), Currency::USD)
    }

    /// A zero amount
    pub fn eur_zero() -> Money {
        Money::zero(Currency::EUR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard flight date used across fixtures
    pub fn flight_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    /// Scheduled arrival for the standard flight
    pub fn scheduled_arrival() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 14, 0, 0).unwrap()
    }

    /// A fixed "now" instant for deterministic lifecycle tests
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
    }

    /// The instant the service fee was captured
    pub fn payment_captured_at() -> DateTime<Utc> {
        Self::now()
    }

    /// One hour past the 48-hour filing deadline
    pub fn past_filing_deadline() -> DateTime<Utc> {
        Self::payment_captured_at() + chrono::Duration::hours(49)
    }

    /// An instant inside the 24-hour customer-request window
    pub fn inside_request_window() -> DateTime<Utc> {
        Self::payment_captured_at() + chrono::Duration::hours(12)
    }
}

/// Fixture for flight observations and reconciled records
pub struct FlightFixtures;

impl FlightFixtures {
    /// The standard disrupted flight
    pub fn designator() -> FlightDesignator {
        FlightDesignator::new("LH", "1234", TemporalFixtures::flight_date())
    }

    /// One provider observation with the given delay and confidence
    pub fn observation(delay_minutes: i64, confidence: f64, source: &str) -> FlightObservation {
        FlightObservation::new(
            Self::designator(),
            delay_minutes,
            false,
            confidence,
            source,
            TemporalFixtures::now(),
        )
    }

    /// A single-source reconciled record with the given delay
    pub fn delayed_record(delay_minutes: i64) -> ReconciledFlightRecord {
        reconcile(&[Self::observation(delay_minutes, 0.9, "primary")]).unwrap()
    }

    /// A single-source reconciled record for a cancelled flight
    pub fn cancelled_record() -> ReconciledFlightRecord {
        let flight = Self::designator();
        let obs =
            FlightObservation::new(flight, 0, true, 0.9, "primary", TemporalFixtures::now());
        reconcile(&[obs]).unwrap()
    }
}

/// Fixture for jurisdictional routes
pub struct RouteFixtures;

impl RouteFixtures {
    /// Intra-EU short-haul route (under 1,500 km)
    pub fn eu_short_haul() -> Route {
        Route::new("DE", "ES", "DE", 800.0)
    }

    /// Intra-EU medium-haul route (1,500 to 3,500 km)
    pub fn eu_medium_haul() -> Route {
        Route::new("DE", "ES", "DE", 1_600.0)
    }

    /// EU-departure long-haul route (over 3,500 km)
    pub fn eu_long_haul() -> Route {
        Route::new("DE", "US", "DE", 6_200.0)
    }

    /// UK-departure route governed by UK261
    pub fn uk_departure() -> Route {
        Route::new("GB", "ES", "GB", 1_800.0)
    }

    /// US-origin route governed by US DOT
    pub fn us_origin() -> Route {
        Route::new("US", "MX", "US", 2_000.0)
    }

    /// Canada-origin route governed by the APPR
    pub fn canada_origin() -> Route {
        Route::new("CA", "US", "CA", 700.0)
    }
}

/// Fixture for claims in common lifecycle positions
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// The standard passenger
    pub fn passenger() -> Passenger {
        Passenger {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    /// The standard disrupted flight leg
    pub fn leg() -> FlightLeg {
        FlightLeg {
            flight: FlightFixtures::designator(),
            origin: "FRA".to_string(),
            destination: "MAD".to_string(),
            route: RouteFixtures::eu_medium_haul(),
        }
    }

    /// A freshly submitted delay claim with a booking reference
    pub fn submitted_delay_claim() -> Claim {
        let mut claim = Claim::submitted(
            Self::passenger(),
            Self::leg(),
            DisruptionInput::Delay,
            TemporalFixtures::now(),
        );
        claim.booking_reference = Some("ABC123".to_string());
        claim
    }

    /// A submitted claim with the service fee captured
    pub fn paid_claim() -> Claim {
        let mut claim = Self::submitted_delay_claim();
        claim.record_payment(Self::captured_payment());
        claim
    }

    /// The standard captured service-fee payment
    pub fn captured_payment() -> PaymentInfo {
        PaymentInfo {
            reference: "pay_789".to_string(),
            amount: MoneyFixtures::service_fee(),
            status: PaymentStatus::Captured,
            captured_at: TemporalFixtures::payment_captured_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_claims::ClaimStatus;
    use domain_eligibility::Regulation;

    #[test]
    fn test_delayed_record_carries_delay() {
        let record = FlightFixtures::delayed_record(200);
        assert_eq!(record.delay_minutes, 200);
        assert!(!record.cancelled);
    }

    #[test]
    fn test_routes_resolve_expected_regimes() {
        assert_eq!(
            RouteFixtures::eu_medium_haul().resolve_regulation(),
            Some(Regulation::Eu261)
        );
        assert_eq!(
            RouteFixtures::uk_departure().resolve_regulation(),
            Some(Regulation::Uk261)
        );
        assert_eq!(
            RouteFixtures::us_origin().resolve_regulation(),
            Some(Regulation::UsDot)
        );
    }

    #[test]
    fn test_paid_claim_is_submitted_with_payment() {
        let claim = ClaimFixtures::paid_claim();
        assert_eq!(claim.status, ClaimStatus::Submitted);
        assert!(claim.payment.is_some());
    }
}
