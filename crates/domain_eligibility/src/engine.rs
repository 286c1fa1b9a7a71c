//! The eligibility engine

use std::collections::HashMap;

use tracing::debug;

use crate::classifier::CircumstanceClassifier;
use crate::decision::EligibilityDecision;
use crate::disruption::DisruptionInput;
use crate::distance::DistanceBand;
use crate::error::EligibilityError;
use crate::policies::{
    BandedStatute, CanadaApprPolicy, EvaluationContext, RegulationPolicy, UsDotPolicy,
};
use crate::regulation::{Regulation, Route};
use domain_flight::ReconciledFlightRecord;

/// Flight-record confidence below this flags the decision as low-confidence
pub const MIN_CONFIDENCE: f64 = 0.5;

/// Pure eligibility evaluator over registered per-regime policies
pub struct EligibilityEngine {
    policies: HashMap<Regulation, Box<dyn RegulationPolicy>>,
    classifier: CircumstanceClassifier,
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::with_standard_policies()
    }
}

impl EligibilityEngine {
    /// Engine with every regime this service supports
    pub fn with_standard_policies() -> Self {
        let mut engine = Self {
            policies: HashMap::new(),
            classifier: CircumstanceClassifier::default(),
        };
        engine.register(Box::new(BandedStatute::eu261()));
        engine.register(Box::new(BandedStatute::uk261()));
        engine.register(Box::new(BandedStatute::swiss()));
        engine.register(Box::new(BandedStatute::norwegian()));
        engine.register(Box::new(UsDotPolicy));
        engine.register(Box::new(CanadaApprPolicy));
        engine
    }

    /// Registers (or replaces) the policy for one regime
    pub fn register(&mut self, policy: Box<dyn RegulationPolicy>) {
        self.policies.insert(policy.regulation(), policy);
    }

    pub fn with_classifier(mut self, classifier: CircumstanceClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Evaluates eligibility and compensation for one disruption
    ///
    /// Used both pre-payment as a quote and post-payment as claim
    /// validation; low flight-record confidence flags the decision rather
    /// than refusing it.
    pub fn evaluate(
        &self,
        flight: &ReconciledFlightRecord,
        disruption: &DisruptionInput,
        route: &Route,
    ) -> Result<EligibilityDecision, EligibilityError> {
        let confidence = flight.confidence;
        let low_confidence = confidence < MIN_CONFIDENCE;

        let Some(regulation) = route.resolve_regulation() else {
            return Ok(EligibilityDecision::uncovered_route(
                format!(
                    "No passenger-compensation regulation covers a {} to {} route on a {} carrier",
                    route.origin_country, route.destination_country, route.carrier_country
                ),
                confidence,
                low_confidence,
            ));
        };

        let policy = self
            .policies
            .get(&regulation)
            .ok_or(EligibilityError::UnsupportedRegulation(regulation))?;

        let ctx = EvaluationContext {
            flight,
            disruption,
            band: DistanceBand::from_km(route.distance_km),
            extraordinary: self
                .classifier
                .extraordinary_category(flight.status_reason.as_deref()),
        };

        let outcome = policy.evaluate(&ctx)?;
        debug!(
            flight = %flight.flight,
            regulation = %regulation,
            disruption = ?disruption.disruption_type(),
            eligible = outcome.eligible,
            "eligibility evaluated"
        );

        Ok(match outcome.amount {
            Some(amount) if outcome.eligible => EligibilityDecision::eligible(
                regulation,
                amount,
                outcome.reason,
                confidence,
                low_confidence,
            ),
            _ => EligibilityDecision::ineligible(
                regulation,
                outcome.reason,
                confidence,
                low_confidence,
            ),
        })
    }
}
