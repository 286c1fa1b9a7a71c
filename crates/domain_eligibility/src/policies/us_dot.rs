//! US DOT rules
//!
//! Materially different from the EU shape: no distance banding, no cash
//! compensation for delay or cancellation, and denied-boarding awards as
//! fare multiples under statutory caps.

use rust_decimal_macros::dec;

use core_kernel::{Currency, Money};

use crate::disruption::{DeniedBoardingReason, DisruptionInput, DisruptionType};
use crate::error::EligibilityError;
use crate::regulation::Regulation;

use super::{already_compensated, EvaluationContext, PolicyOutcome, RegulationPolicy};

/// Arrival delay (via substitute transport) at or under this owes nothing, minutes
const NO_COMPENSATION_DELAY_MINUTES: i64 = 60;

/// Arrival delays over this move from the 200% to the 400% tier, minutes
const HIGHER_TIER_DELAY_MINUTES: i64 = 120;

pub struct UsDotPolicy;

impl UsDotPolicy {
    fn denied_boarding(
        &self,
        ctx: &EvaluationContext<'_>,
        reason: DeniedBoardingReason,
        offered: Option<&Money>,
        one_way_fare: Option<&Money>,
    ) -> Result<PolicyOutcome, EligibilityError> {
        if reason != DeniedBoardingReason::Oversold {
            return Ok(PolicyOutcome::ineligible(
                "Not eligible under US DOT: denied boarding compensation covers involuntary oversales only",
            ));
        }

        let fare = one_way_fare.ok_or_else(|| {
            EligibilityError::missing_fields(DisruptionType::DeniedBoarding, vec!["one_way_fare"])
        })?;

        let delay = ctx.flight.delay_minutes;
        if delay <= NO_COMPENSATION_DELAY_MINUTES {
            return Ok(PolicyOutcome::ineligible(
                "Not eligible under US DOT: substitute transport arrived within one hour of the original flight",
            ));
        }

        let (multiple, cap_minor, tier) = if delay <= HIGHER_TIER_DELAY_MINUTES {
            (dec!(2), 775_00, "200%")
        } else {
            (dec!(4), 1_550_00, "400%")
        };
        let cap = Money::from_minor(cap_minor, Currency::USD);
        let entitlement = fare.multiply(multiple).min(&cap).map_err(|_| {
            // A non-USD fare cannot be compared against the USD cap
            EligibilityError::missing_fields(DisruptionType::DeniedBoarding, vec!["one_way_fare"])
        })?;

        if already_compensated(offered, &entitlement) {
            return Ok(PolicyOutcome::ineligible(
                "Not eligible under US DOT: the airline already paid equivalent compensation at the gate",
            ));
        }

        Ok(PolicyOutcome::eligible(
            entitlement.round_to_currency(),
            format!(
                "Eligible under US DOT: involuntary denied boarding, {tier} of the one-way fare (capped)"
            ),
        ))
    }
}

impl RegulationPolicy for UsDotPolicy {
    fn regulation(&self) -> Regulation {
        Regulation::UsDot
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<PolicyOutcome, EligibilityError> {
        match ctx.disruption {
            DisruptionInput::Delay => Ok(PolicyOutcome::ineligible(
                "Not eligible under US DOT: no cash compensation is mandated for delays",
            )),
            DisruptionInput::Cancellation { .. } => Ok(PolicyOutcome::ineligible(
                "Not eligible under US DOT: cancellations entitle you to a refund of the unused ticket, not standardized compensation",
            )),
            DisruptionInput::DeniedBoarding {
                reason,
                offered_compensation,
                one_way_fare,
                ..
            } => self.denied_boarding(
                ctx,
                *reason,
                offered_compensation.as_ref(),
                one_way_fare.as_ref(),
            ),
            DisruptionInput::Downgrade {
                booked_class,
                actual_class,
                fare_difference,
                ..
            } => {
                if actual_class >= booked_class {
                    return Ok(PolicyOutcome::ineligible(
                        "Not eligible under US DOT: travelled cabin is not below the booked cabin",
                    ));
                }
                let difference = (*fare_difference).ok_or_else(|| {
                    EligibilityError::missing_fields(
                        DisruptionType::Downgrade,
                        vec!["fare_difference"],
                    )
                })?;
                Ok(PolicyOutcome::eligible(
                    difference,
                    "Eligible under US DOT: the fare difference for the downgraded cabin is refunded",
                ))
            }
        }
    }
}
