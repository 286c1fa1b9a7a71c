//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use core_kernel::{ClaimId, Currency, Money};
use domain_flight::{FlightDesignator, FlightObservation};

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::USD),
        Just(Currency::CHF),
        Just(Currency::NOK),
        Just(Currency::CAD),
    ]
}

/// Strategy for generating valid positive amounts in minor units
pub fn positive_amount_minor_strategy() -> impl Strategy<Value = i64> {
    1i64..1_000_000_000i64
}

/// Strategy for generating valid Money values with positive amounts
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (positive_amount_minor_strategy(), currency_strategy())
        .prop_map(|(amount, currency)| Money::from_minor(amount, currency))
}

/// Strategy for generating provider confidence values in [0, 1]
pub fn confidence_strategy() -> impl Strategy<Value = f64> {
    (0u32..=1000u32).prop_map(|n| n as f64 / 1000.0)
}

/// Strategy for generating arrival delays in minutes (0 to 16 hours)
pub fn delay_minutes_strategy() -> impl Strategy<Value = i64> {
    0i64..960i64
}

/// Strategy for generating journey distances in kilometers
pub fn distance_km_strategy() -> impl Strategy<Value = f64> {
    (100u32..15_000u32).prop_map(|km| km as f64)
}

/// Strategy for generating flight dates within 2025
pub fn flight_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u32..365u32).prop_map(|days| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Duration::days(days as i64)
    })
}

/// Strategy for generating flight designators
pub fn flight_designator_strategy() -> impl Strategy<Value = FlightDesignator> {
    ("[A-Z]{2}", "[1-9][0-9]{1,3}", flight_date_strategy())
        .prop_map(|(carrier, number, date)| FlightDesignator::new(carrier, number, date))
}

/// Strategy for generating single provider observations of one fixed flight
///
/// The flight identity is held constant so generated pairs can be
/// reconciled against each other.
pub fn observation_strategy(source: &'static str) -> impl Strategy<Value = FlightObservation> {
    (delay_minutes_strategy(), confidence_strategy(), any::<bool>()).prop_map(
        move |(delay, confidence, cancelled)| {
            let flight =
                FlightDesignator::new("LH", "1234", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
            FlightObservation::new(
                flight,
                delay,
                cancelled,
                confidence,
                source,
                Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap(),
            )
        },
    )
}

/// Strategy for generating ClaimId values
pub fn claim_id_strategy() -> impl Strategy<Value = ClaimId> {
    any::<[u8; 16]>().prop_map(|bytes| ClaimId::from_uuid(uuid::Uuid::from_bytes(bytes)))
}

/// Strategy for generating valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{5,10}", "[a-z]{3,8}").prop_map(|(local, domain)| format!("{local}@{domain}.com"))
}

/// Strategy for generating passenger names
pub fn name_strategy() -> impl Strategy<Value = String> {
    ("[A-Z][a-z]{2,10}", "[A-Z][a-z]{2,10}").prop_map(|(first, last)| format!("{first} {last}"))
}
