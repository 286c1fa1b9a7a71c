//! Airline Directory
//!
//! Static reference data describing how each supported airline accepts
//! compensation claims: the submission channel, the documents and claim fields
//! it requires, how quickly it usually responds, and the follow-up cadence
//! after filing.
//!
//! Lookup is by canonical airline code with a secondary normalized-alias index
//! built once at construction, so request-time resolution never scans.

pub mod profile;
pub mod directory;
pub mod error;

pub use profile::{
    AirlineProfile, SubmissionChannel, DocumentKind, FollowUpSchedule,
    DEFAULT_FOLLOW_UP_DAYS,
};
pub use directory::{AirlineDirectory, builtin_directory};
pub use error::DirectoryError;
