//! Eligibility decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::Money;

use crate::regulation::Regulation;

/// Outcome of one eligibility evaluation
///
/// Never mutated after creation; a re-check produces a new decision.
/// Doubles as the conversion-facing quote, so low flight-record confidence
/// flags the decision instead of refusing to produce one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityDecision {
    pub eligible: bool,
    /// Compensation amount when eligible
    pub amount: Option<Money>,
    /// Regime the decision was made under; `None` when no regime covers the route
    pub regulation: Option<Regulation>,
    /// Human-readable rationale surfaced to the passenger
    pub reason: String,
    /// Confidence inherited from the underlying flight record
    pub confidence: f64,
    /// Set when confidence fell below the evaluation threshold
    pub low_confidence: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl EligibilityDecision {
    /// Creates an eligible decision with the computed amount
    pub fn eligible(
        regulation: Regulation,
        amount: Money,
        reason: impl Into<String>,
        confidence: f64,
        low_confidence: bool,
    ) -> Self {
        Self {
            eligible: true,
            amount: Some(amount),
            regulation: Some(regulation),
            reason: reason.into(),
            confidence,
            low_confidence,
            evaluated_at: Utc::now(),
        }
    }

    /// Creates an ineligible decision under a resolved regime
    pub fn ineligible(
        regulation: Regulation,
        reason: impl Into<String>,
        confidence: f64,
        low_confidence: bool,
    ) -> Self {
        Self {
            eligible: false,
            amount: None,
            regulation: Some(regulation),
            reason: reason.into(),
            confidence,
            low_confidence,
            evaluated_at: Utc::now(),
        }
    }

    /// Creates an ineligible decision for a route no regime covers
    pub fn uncovered_route(reason: impl Into<String>, confidence: f64, low_confidence: bool) -> Self {
        Self {
            eligible: false,
            amount: None,
            regulation: None,
            reason: reason.into(),
            confidence,
            low_confidence,
            evaluated_at: Utc::now(),
        }
    }
}
