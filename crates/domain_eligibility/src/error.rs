//! Eligibility domain errors

use thiserror::Error;

use crate::disruption::DisruptionType;
use crate::regulation::Regulation;

/// Errors that can occur during eligibility evaluation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EligibilityError {
    /// The disruption input lacks fields this regime needs; the caller must
    /// collect them before re-evaluating — the engine does not guess
    #[error("Missing required fields for {disruption_type:?}: {fields:?}")]
    MissingFields {
        disruption_type: DisruptionType,
        fields: Vec<&'static str>,
    },

    #[error("No policy registered for {0}")]
    UnsupportedRegulation(Regulation),
}

impl EligibilityError {
    pub fn missing_fields(disruption_type: DisruptionType, fields: Vec<&'static str>) -> Self {
        EligibilityError::MissingFields {
            disruption_type,
            fields,
        }
    }
}
