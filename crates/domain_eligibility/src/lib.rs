//! Eligibility Domain
//!
//! Pure computation of statutory compensation for flight disruptions.
//! Each regulatory regime (EU261, UK261, US DOT, Canada APPR, and the Swiss
//! and Norwegian analogues) is its own [`RegulationPolicy`] implementation;
//! the [`EligibilityEngine`] resolves the applicable regime from the route
//! and dispatches to it. Adding a jurisdiction means registering a new
//! policy, never editing an existing one.

pub mod disruption;
pub mod distance;
pub mod regulation;
pub mod classifier;
pub mod decision;
pub mod policies;
pub mod engine;
pub mod error;

pub use disruption::{
    AlternativeFlight, CabinClass, DeniedBoardingReason, DisruptionInput, DisruptionType,
};
pub use distance::{great_circle_km, DistanceBand};
pub use regulation::{Regulation, Route};
pub use classifier::{CircumstanceCategory, CircumstanceClassifier};
pub use decision::EligibilityDecision;
pub use policies::{EvaluationContext, PolicyOutcome, RegulationPolicy};
pub use engine::{EligibilityEngine, MIN_CONFIDENCE};
pub use error::EligibilityError;
