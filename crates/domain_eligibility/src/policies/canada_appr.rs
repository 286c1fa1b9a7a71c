//! Canada APPR rules
//!
//! Fixed compensation tiers by length of arrival delay rather than journey
//! distance, with its own denied-boarding tier table.

use core_kernel::{Currency, Money};

use crate::disruption::{DeniedBoardingReason, DisruptionInput, DisruptionType};
use crate::error::EligibilityError;
use crate::regulation::Regulation;

use super::{already_compensated, EvaluationContext, PolicyOutcome, RegulationPolicy};

/// Delay tiers in minutes: 3-6h, 6-9h, 9h+
const TIER_ONE_MINUTES: i64 = 180;
const TIER_TWO_MINUTES: i64 = 360;
const TIER_THREE_MINUTES: i64 = 540;

pub struct CanadaApprPolicy;

impl CanadaApprPolicy {
    fn cad(minor: i64) -> Money {
        Money::from_minor(minor, Currency::CAD)
    }

    /// Delay/cancellation compensation tier for an arrival delay
    fn delay_tier(delay_minutes: i64) -> Option<Money> {
        if delay_minutes >= TIER_THREE_MINUTES {
            Some(Self::cad(1_000_00))
        } else if delay_minutes >= TIER_TWO_MINUTES {
            Some(Self::cad(700_00))
        } else if delay_minutes >= TIER_ONE_MINUTES {
            Some(Self::cad(400_00))
        } else {
            None
        }
    }

    /// Denied-boarding tier for an arrival delay
    fn denied_boarding_tier(delay_minutes: i64) -> Money {
        if delay_minutes >= TIER_THREE_MINUTES {
            Self::cad(2_400_00)
        } else if delay_minutes >= TIER_TWO_MINUTES {
            Self::cad(1_800_00)
        } else {
            Self::cad(900_00)
        }
    }
}

impl RegulationPolicy for CanadaApprPolicy {
    fn regulation(&self) -> Regulation {
        Regulation::CanadaAppr
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<PolicyOutcome, EligibilityError> {
        if let Some(category) = ctx.extraordinary {
            return Ok(PolicyOutcome::ineligible(format!(
                "Not eligible under Canada APPR: the disruption was outside the carrier's control ({category})"
            )));
        }

        match ctx.disruption {
            DisruptionInput::Delay => {
                let delay = ctx.flight.delay_minutes;
                match Self::delay_tier(delay) {
                    Some(amount) => Ok(PolicyOutcome::eligible(
                        amount,
                        format!(
                            "Eligible under Canada APPR: arrival delay of {delay} minutes within the carrier's control"
                        ),
                    )),
                    None => Ok(PolicyOutcome::ineligible(format!(
                        "Not eligible under Canada APPR: delay of {delay} minutes is under three hours"
                    ))),
                }
            }
            DisruptionInput::Cancellation {
                notice_days,
                alternative,
            } => {
                if *notice_days >= 14 {
                    return Ok(PolicyOutcome::ineligible(format!(
                        "Not eligible under Canada APPR: {notice_days} days of notice were given (14 or more)"
                    )));
                }
                // Compensation scales with how late the rerouting arrives;
                // no acceptable rerouting is treated as the top tier.
                let arrival_delta = alternative
                    .map(|alt| alt.arrives_later_by_minutes)
                    .unwrap_or(TIER_THREE_MINUTES);
                match Self::delay_tier(arrival_delta) {
                    Some(amount) => Ok(PolicyOutcome::eligible(
                        amount,
                        format!(
                            "Eligible under Canada APPR: cancelled with {notice_days} days of notice"
                        ),
                    )),
                    None => Ok(PolicyOutcome::ineligible(
                        "Not eligible under Canada APPR: the offered rerouting arrives within three hours of the original flight",
                    )),
                }
            }
            DisruptionInput::DeniedBoarding {
                reason,
                offered_compensation,
                ..
            } => {
                if *reason != DeniedBoardingReason::Oversold {
                    return Ok(PolicyOutcome::ineligible(
                        "Not eligible under Canada APPR: compensation covers involuntary denied boarding due to overselling",
                    ));
                }
                let entitlement = Self::denied_boarding_tier(ctx.flight.delay_minutes);
                if already_compensated(offered_compensation.as_ref(), &entitlement) {
                    return Ok(PolicyOutcome::ineligible(
                        "Not eligible under Canada APPR: the airline already paid equivalent compensation at the gate",
                    ));
                }
                Ok(PolicyOutcome::eligible(
                    entitlement,
                    "Eligible under Canada APPR: involuntarily denied boarding on an oversold flight",
                ))
            }
            DisruptionInput::Downgrade {
                booked_class,
                actual_class,
                fare_difference,
                ..
            } => {
                if actual_class >= booked_class {
                    return Ok(PolicyOutcome::ineligible(
                        "Not eligible under Canada APPR: travelled cabin is not below the booked cabin",
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
                    "Eligible under Canada APPR: the fare difference for the downgraded cabin is refunded",
                ))
            }
        }
    }
}
