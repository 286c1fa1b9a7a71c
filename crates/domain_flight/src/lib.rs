//! Flight Data Domain
//!
//! This crate owns everything about what actually happened to a flight:
//! observations reported by third-party flight-status providers, the
//! reconciliation of two independent observations into a single
//! confidence-scored record, and the dual-provider lookup service that
//! queries both providers concurrently and degrades gracefully when one
//! is slow or unavailable.

pub mod observation;
pub mod reconcile;
pub mod ports;
pub mod cache;
pub mod lookup;
pub mod error;

pub use observation::{FlightDesignator, FlightObservation};
pub use reconcile::{
    reconcile, FieldConflict, ReconciledFlightRecord, SourceAgreement,
    CORROBORATION_BONUS, CONFLICT_PENALTY, DELAY_TOLERANCE_MINUTES,
};
pub use ports::FlightDataProvider;
pub use cache::LookupCache;
pub use lookup::FlightLookupService;
pub use error::FlightError;
