//! Disruption inputs
//!
//! Facts the passenger (or the email parser) supplies beyond the flight
//! record itself. Modeled as a tagged union so the type system enforces
//! "all required fields present for this variant" at the boundary; fields
//! that are only required under particular regimes stay `Option` and are
//! validated by the policy that needs them.

use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// The four disruption types with distinct rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionType {
    Delay,
    Cancellation,
    DeniedBoarding,
    Downgrade,
}

/// Cabin classes ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

/// Why boarding was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeniedBoardingReason {
    /// Involuntary denial because the flight was oversold
    Oversold,
    /// Safety, health, or security grounds
    Safety,
    /// Inadequate travel documentation
    Documentation,
    /// Passenger volunteered to give up the seat
    Volunteered,
    Other,
}

/// Timing of a rerouting offer relative to the original schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternativeFlight {
    /// How much earlier the alternative departs, in minutes (0 = same or later)
    pub departs_earlier_by_minutes: i64,
    /// How much later the alternative arrives, in minutes (0 = same or earlier)
    pub arrives_later_by_minutes: i64,
}

impl AlternativeFlight {
    /// True if the offer stays inside the given departure/arrival windows
    pub fn within(&self, max_earlier_minutes: i64, max_later_minutes: i64) -> bool {
        self.departs_earlier_by_minutes <= max_earlier_minutes
            && self.arrives_later_by_minutes <= max_later_minutes
    }
}

/// Disruption-type-specific eligibility inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisruptionInput {
    /// Nothing needed beyond the flight record
    Delay,
    Cancellation {
        /// Days of advance notice the airline gave
        notice_days: u32,
        /// Rerouting offer, if any
        alternative: Option<AlternativeFlight>,
    },
    DeniedBoarding {
        reason: DeniedBoardingReason,
        /// Compensation the airline paid at the gate, if any
        offered_compensation: Option<Money>,
        passengers_affected: u32,
        /// One-way fare; required by fare-multiple regimes (US DOT)
        one_way_fare: Option<Money>,
    },
    Downgrade {
        booked_class: CabinClass,
        actual_class: CabinClass,
        ticket_price: Money,
        /// Booked/actual fare difference; required by refund-the-difference regimes
        fare_difference: Option<Money>,
    },
}

impl DisruptionInput {
    pub fn disruption_type(&self) -> DisruptionType {
        match self {
            DisruptionInput::Delay => DisruptionType::Delay,
            DisruptionInput::Cancellation { .. } => DisruptionType::Cancellation,
            DisruptionInput::DeniedBoarding { .. } => DisruptionType::DeniedBoarding,
            DisruptionInput::Downgrade { .. } => DisruptionType::Downgrade,
        }
    }
}
