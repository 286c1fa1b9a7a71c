//! EU-style distance-banded statutes
//!
//! EC 261/2004 and its mirrors: fixed amounts by great-circle distance band,
//! a 50% reduction for long-haul delays under four hours, notice-based
//! cancellation exclusions, and percentage-of-fare downgrade reimbursement.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, Rate};

use crate::disruption::{DeniedBoardingReason, DisruptionInput};
use crate::distance::DistanceBand;
use crate::error::EligibilityError;
use crate::regulation::Regulation;

use super::{already_compensated, EvaluationContext, PolicyOutcome, RegulationPolicy};

/// Delay at final destination below which no compensation is due, minutes
const DELAY_THRESHOLD_MINUTES: i64 = 180;

/// Long-haul delays shorter than this receive the 50% reduction, minutes
const LONG_HAUL_REDUCTION_CUTOFF_MINUTES: i64 = 240;

/// A distance-banded statute parameterized by regime and currency
///
/// Covers EU261, UK261, and the Swiss and Norwegian analogues, which share
/// the computation but differ in regime identity and payout currency.
pub struct BandedStatute {
    regulation: Regulation,
    currency: Currency,
    short_haul: Decimal,
    medium_haul: Decimal,
    long_haul: Decimal,
}

impl BandedStatute {
    pub fn new(regulation: Regulation, currency: Currency) -> Self {
        Self {
            regulation,
            currency,
            short_haul: dec!(250),
            medium_haul: dec!(400),
            long_haul: dec!(600),
        }
    }

    pub fn eu261() -> Self {
        Self::new(Regulation::Eu261, Currency::EUR)
    }

    pub fn uk261() -> Self {
        Self::new(Regulation::Uk261, Currency::GBP)
    }

    pub fn swiss() -> Self {
        Self::new(Regulation::SwissPassengerRights, Currency::EUR)
    }

    pub fn norwegian() -> Self {
        Self::new(Regulation::NorwayPassengerRights, Currency::EUR)
    }

    fn banded_amount(&self, band: DistanceBand) -> Money {
        let amount = match band {
            DistanceBand::ShortHaul => self.short_haul,
            DistanceBand::MediumHaul => self.medium_haul,
            DistanceBand::LongHaul => self.long_haul,
        };
        Money::new(amount, self.currency)
    }

    fn downgrade_rate(band: DistanceBand) -> Rate {
        match band {
            DistanceBand::ShortHaul => Rate::from_percentage(dec!(30)),
            DistanceBand::MediumHaul => Rate::from_percentage(dec!(50)),
            DistanceBand::LongHaul => Rate::from_percentage(dec!(75)),
        }
    }

    fn evaluate_delay(&self, ctx: &EvaluationContext<'_>) -> PolicyOutcome {
        if let Some(category) = ctx.extraordinary {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: the disruption was caused by extraordinary circumstances ({category})",
                self.regulation
            ));
        }

        let delay = ctx.flight.delay_minutes;
        if delay < DELAY_THRESHOLD_MINUTES {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: delay of {delay} minutes is under three hours at the final destination",
                self.regulation
            ));
        }

        let full = self.banded_amount(ctx.band);
        if ctx.band == DistanceBand::LongHaul && delay < LONG_HAUL_REDUCTION_CUTOFF_MINUTES {
            return PolicyOutcome::eligible(
                full.multiply(dec!(0.5)),
                format!(
                    "Eligible under {}: long-haul delay of {delay} minutes (under four hours), 50% reduction applies",
                    self.regulation
                ),
            );
        }

        PolicyOutcome::eligible(
            full,
            format!(
                "Eligible under {}: delay of {delay} minutes at the final destination",
                self.regulation
            ),
        )
    }

    fn evaluate_cancellation(
        &self,
        ctx: &EvaluationContext<'_>,
        notice_days: u32,
        alternative: Option<&crate::disruption::AlternativeFlight>,
    ) -> PolicyOutcome {
        if let Some(category) = ctx.extraordinary {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: the cancellation was caused by extraordinary circumstances ({category})",
                self.regulation
            ));
        }

        if notice_days >= 14 {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: {notice_days} days of notice were given (14 or more)",
                self.regulation
            ));
        }

        // Between 7 and 14 days the rerouting must stay within -1h/+2h of the
        // original schedule to exclude compensation; under 7 days the arrival
        // window widens to +4h.
        let excluded_by_alternative = match alternative {
            Some(alt) if notice_days >= 7 => alt.within(60, 120),
            Some(alt) => alt.within(60, 240),
            None => false,
        };
        if excluded_by_alternative {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: an acceptable alternative flight was offered with {notice_days} days of notice",
                self.regulation
            ));
        }

        PolicyOutcome::eligible(
            self.banded_amount(ctx.band),
            format!(
                "Eligible under {}: cancelled with {notice_days} days of notice and no acceptable alternative",
                self.regulation
            ),
        )
    }

    fn evaluate_denied_boarding(
        &self,
        ctx: &EvaluationContext<'_>,
        reason: DeniedBoardingReason,
        offered: Option<&Money>,
    ) -> PolicyOutcome {
        if reason != DeniedBoardingReason::Oversold {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: compensation covers involuntary denied boarding due to overbooking, not {reason:?}",
                self.regulation
            ));
        }

        let entitlement = self.banded_amount(ctx.band);
        if already_compensated(offered, &entitlement) {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: the airline already paid equivalent compensation at the gate",
                self.regulation
            ));
        }

        PolicyOutcome::eligible(
            entitlement,
            format!(
                "Eligible under {}: involuntarily denied boarding on an oversold flight",
                self.regulation
            ),
        )
    }

    fn evaluate_downgrade(
        &self,
        ctx: &EvaluationContext<'_>,
        booked: crate::disruption::CabinClass,
        actual: crate::disruption::CabinClass,
        ticket_price: &Money,
    ) -> PolicyOutcome {
        if actual >= booked {
            return PolicyOutcome::ineligible(format!(
                "Not eligible under {}: travelled cabin is not below the booked cabin",
                self.regulation
            ));
        }

        let rate = Self::downgrade_rate(ctx.band);
        PolicyOutcome::eligible(
            rate.apply(ticket_price).round_to_currency(),
            format!(
                "Eligible under {}: downgraded from {booked:?} to {actual:?}, {rate} of the ticket price is reimbursed",
                self.regulation
            ),
        )
    }
}

impl RegulationPolicy for BandedStatute {
    fn regulation(&self) -> Regulation {
        self.regulation
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<PolicyOutcome, EligibilityError> {
        Ok(match ctx.disruption {
            DisruptionInput::Delay => self.evaluate_delay(ctx),
            DisruptionInput::Cancellation {
                notice_days,
                alternative,
            } => self.evaluate_cancellation(ctx, *notice_days, alternative.as_ref()),
            DisruptionInput::DeniedBoarding {
                reason,
                offered_compensation,
                ..
            } => self.evaluate_denied_boarding(ctx, *reason, offered_compensation.as_ref()),
            DisruptionInput::Downgrade {
                booked_class,
                actual_class,
                ticket_price,
                ..
            } => self.evaluate_downgrade(ctx, *booked_class, *actual_class, ticket_price),
        })
    }
}
