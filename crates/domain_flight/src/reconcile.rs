//! Reconciliation of independent flight observations
//!
//! Two providers are queried for every lookup; either may be absent. This
//! module merges whatever came back into one record with a combined
//! confidence score and field-level conflict annotations. It is a pure
//! function over its inputs; sourcing and caching are the caller's job.

use serde::{Deserialize, Serialize};

use crate::error::FlightError;
use crate::observation::{FlightDesignator, FlightObservation};

/// Delay readings within this many minutes of each other count as agreement
pub const DELAY_TOLERANCE_MINUTES: i64 = 15;

/// Confidence bonus applied when two sources corroborate each other
pub const CORROBORATION_BONUS: f64 = 0.10;

/// Confidence penalty applied when sources disagree
pub const CONFLICT_PENALTY: f64 = 0.10;

/// How the resolved record relates to its sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceAgreement {
    /// Only one provider returned data
    SingleSource,
    /// Both providers returned data and agreed within tolerance
    Corroborated,
    /// Providers disagreed; the higher-confidence source's values were kept
    Conflicted,
}

/// A field-level disagreement between two sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConflict {
    pub field: &'static str,
    pub preferred_value: String,
    pub preferred_source: String,
    pub discarded_value: String,
    pub discarded_source: String,
}

/// The merged view of a flight, derived from one or two observations
///
/// Computed on demand and embedded into the claim or eligibility check that
/// requested it; never persisted independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledFlightRecord {
    pub flight: FlightDesignator,
    /// Resolved delay at the final destination in minutes
    pub delay_minutes: i64,
    pub cancelled: bool,
    pub status_reason: Option<String>,
    /// Combined confidence in [0, 1]
    pub confidence: f64,
    pub agreement: SourceAgreement,
    pub conflicts: Vec<FieldConflict>,
    pub sources: Vec<String>,
}

/// Merges one or two observations of the same flight into a single record
///
/// With two observations the higher-confidence one is the primary source.
/// Agreement on delay (within [`DELAY_TOLERANCE_MINUTES`]) and cancellation
/// earns a corroboration bonus; any disagreement is annotated per field and
/// costs a penalty instead.
pub fn reconcile(observations: &[FlightObservation]) -> Result<ReconciledFlightRecord, FlightError> {
    match observations {
        [] => Err(FlightError::NoFlightData),
        [single] => Ok(single_source(single)),
        _ => {
            // More than two can only happen if a caller fans out beyond the
            // standard provider pair; keep the two most confident reports.
            let mut ranked: Vec<&FlightObservation> = observations.iter().collect();
            ranked.sort_by(|a, b| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            two_sources(ranked[0], ranked[1])
        }
    }
}

fn single_source(obs: &FlightObservation) -> ReconciledFlightRecord {
    ReconciledFlightRecord {
        flight: obs.flight.clone(),
        delay_minutes: obs.effective_delay_minutes(),
        cancelled: obs.cancelled,
        status_reason: obs.status_reason.clone(),
        confidence: obs.confidence,
        agreement: SourceAgreement::SingleSource,
        conflicts: Vec::new(),
        sources: vec![obs.source.clone()],
    }
}

fn two_sources(
    primary: &FlightObservation,
    secondary: &FlightObservation,
) -> Result<ReconciledFlightRecord, FlightError> {
    if primary.flight != secondary.flight {
        return Err(FlightError::MismatchedObservations {
            first: primary.flight.to_string(),
            second: secondary.flight.to_string(),
        });
    }

    let primary_delay = primary.effective_delay_minutes();
    let secondary_delay = secondary.effective_delay_minutes();

    let mut conflicts = Vec::new();
    if (primary_delay - secondary_delay).abs() > DELAY_TOLERANCE_MINUTES {
        conflicts.push(FieldConflict {
            field: "delay_minutes",
            preferred_value: primary_delay.to_string(),
            preferred_source: primary.source.clone(),
            discarded_value: secondary_delay.to_string(),
            discarded_source: secondary.source.clone(),
        });
    }
    if primary.cancelled != secondary.cancelled {
        conflicts.push(FieldConflict {
            field: "cancelled",
            preferred_value: primary.cancelled.to_string(),
            preferred_source: primary.source.clone(),
            discarded_value: secondary.cancelled.to_string(),
            discarded_source: secondary.source.clone(),
        });
    }

    let max_confidence = primary.confidence.max(secondary.confidence);
    let (agreement, confidence) = if conflicts.is_empty() {
        (
            SourceAgreement::Corroborated,
            (max_confidence + CORROBORATION_BONUS).min(1.0),
        )
    } else {
        tracing::warn!(
            flight = %primary.flight,
            conflicts = conflicts.len(),
            "flight observations disagree; preferring {}",
            primary.source
        );
        (
            SourceAgreement::Conflicted,
            (max_confidence - CONFLICT_PENALTY).max(0.0),
        )
    };

    Ok(ReconciledFlightRecord {
        flight: primary.flight.clone(),
        delay_minutes: primary_delay,
        cancelled: primary.cancelled,
        status_reason: primary
            .status_reason
            .clone()
            .or_else(|| secondary.status_reason.clone()),
        confidence,
        agreement,
        conflicts,
        sources: vec![primary.source.clone(), secondary.source.clone()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn obs(delay: i64, cancelled: bool, confidence: f64, source: &str) -> FlightObservation {
        let flight =
            FlightDesignator::new("LH", "1234", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        FlightObservation::new(flight, delay, cancelled, confidence, source, Utc::now())
    }

    #[test]
    fn test_no_observations_is_no_flight_data() {
        assert!(matches!(reconcile(&[]), Err(FlightError::NoFlightData)));
    }

    #[test]
    fn test_single_source_passes_through() {
        let record = reconcile(&[obs(200, false, 0.8, "primary")]).unwrap();

        assert_eq!(record.delay_minutes, 200);
        assert_eq!(record.confidence, 0.8);
        assert_eq!(record.agreement, SourceAgreement::SingleSource);
        assert!(record.conflicts.is_empty());
    }

    #[test]
    fn test_agreement_within_tolerance_boosts_confidence() {
        let record =
            reconcile(&[obs(200, false, 0.8, "primary"), obs(210, false, 0.7, "secondary")])
                .unwrap();

        assert_eq!(record.agreement, SourceAgreement::Corroborated);
        assert!((record.confidence - 0.9).abs() < 1e-9);
        assert!(record.conflicts.is_empty());
        // Higher-confidence source supplies the resolved values
        assert_eq!(record.delay_minutes, 200);
    }

    #[test]
    fn test_confidence_boost_is_capped_at_one() {
        let record =
            reconcile(&[obs(200, false, 0.97, "primary"), obs(205, false, 0.9, "secondary")])
                .unwrap();
        assert_eq!(record.confidence, 1.0);
    }

    #[test]
    fn test_delay_disagreement_is_annotated_and_penalized() {
        let record =
            reconcile(&[obs(60, false, 0.6, "primary"), obs(200, false, 0.9, "secondary")])
                .unwrap();

        // Higher-confidence source wins regardless of argument order
        assert_eq!(record.delay_minutes, 200);
        assert_eq!(record.agreement, SourceAgreement::Conflicted);
        assert!((record.confidence - 0.8).abs() < 1e-9);

        assert_eq!(record.conflicts.len(), 1);
        let conflict = &record.conflicts[0];
        assert_eq!(conflict.field, "delay_minutes");
        assert_eq!(conflict.preferred_source, "secondary");
        assert_eq!(conflict.discarded_value, "60");
    }

    #[test]
    fn test_cancellation_disagreement_is_annotated() {
        let record =
            reconcile(&[obs(0, true, 0.9, "primary"), obs(0, false, 0.5, "secondary")]).unwrap();

        assert!(record.cancelled);
        assert_eq!(record.conflicts.len(), 1);
        assert_eq!(record.conflicts[0].field, "cancelled");
    }

    #[test]
    fn test_mismatched_flights_rejected() {
        let a = obs(10, false, 0.9, "primary");
        let mut b = obs(10, false, 0.8, "secondary");
        b.flight.number = "9999".to_string();

        assert!(matches!(
            reconcile(&[a, b]),
            Err(FlightError::MismatchedObservations { .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;

    fn obs(delay: i64, confidence: f64, source: &str) -> FlightObservation {
        let flight =
            FlightDesignator::new("LH", "1234", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        FlightObservation::new(flight, delay, false, confidence, source, Utc::now())
    }

    proptest! {
        #[test]
        fn agreement_never_lowers_confidence_below_max(
            delay in 0i64..600,
            jitter in 0i64..=DELAY_TOLERANCE_MINUTES,
            a in 0.0f64..=1.0,
            b in 0.0f64..=1.0
        ) {
            let record = reconcile(&[
                obs(delay, a, "primary"),
                obs(delay + jitter, b, "secondary"),
            ]).unwrap();

            prop_assert!(record.confidence >= a.max(b));
            prop_assert!(record.confidence <= 1.0);
        }

        #[test]
        fn disagreement_never_raises_confidence_above_max(
            delay in 0i64..600,
            gap in (DELAY_TOLERANCE_MINUTES + 1)..500,
            a in 0.0f64..=1.0,
            b in 0.0f64..=1.0
        ) {
            let record = reconcile(&[
                obs(delay, a, "primary"),
                obs(delay + gap, b, "secondary"),
            ]).unwrap();

            prop_assert!(!record.conflicts.is_empty());
            prop_assert!(record.confidence <= a.max(b));
            prop_assert!(record.confidence >= 0.0);
        }
    }
}
