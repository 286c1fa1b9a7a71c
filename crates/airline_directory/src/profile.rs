//! Airline profile schema

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Fallback follow-up interval when an airline has no configured schedule
pub const DEFAULT_FOLLOW_UP_DAYS: u32 = 14;

/// How a claim is submitted to the airline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum SubmissionChannel {
    /// Claim sent to the airline's customer relations mailbox
    Email { address: String },
    /// Claim entered into the airline's web claim form
    WebForm { url: String },
    /// Claim posted to the airline's customer relations address
    Postal { address: String },
}

impl SubmissionChannel {
    /// Returns the destination the submission package is addressed to
    pub fn recipient(&self) -> &str {
        match self {
            SubmissionChannel::Email { address } => address,
            SubmissionChannel::WebForm { url } => url,
            SubmissionChannel::Postal { address } => address,
        }
    }
}

/// Documents an airline may require with a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    BoardingPass,
    DisruptionProof,
    BookingConfirmation,
    IdDocument,
    ExpenseReceipts,
    PowerOfAttorney,
}

/// Ordered follow-up intervals after filing, in days
///
/// The first entry schedules the initial follow-up after filing; each
/// airline-correspondence advance consumes the next entry. The last entry
/// repeats once the schedule is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUpSchedule {
    intervals_days: Vec<u32>,
}

impl FollowUpSchedule {
    pub fn new(intervals_days: Vec<u32>) -> Self {
        Self { intervals_days }
    }

    /// A schedule with no configured entries; every lookup falls back to
    /// [`DEFAULT_FOLLOW_UP_DAYS`].
    pub fn unconfigured() -> Self {
        Self {
            intervals_days: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals_days.is_empty()
    }

    /// Interval for the follow-up at the given position (0 = first after
    /// filing). Exhausted schedules repeat their last entry; unconfigured
    /// schedules use the default.
    pub fn interval_at(&self, index: usize) -> Duration {
        let days = self
            .intervals_days
            .get(index)
            .or_else(|| self.intervals_days.last())
            .copied()
            .unwrap_or(DEFAULT_FOLLOW_UP_DAYS);
        Duration::days(days as i64)
    }
}

/// Reference data for one airline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineProfile {
    /// Canonical airline code (IATA-style)
    pub code: String,
    /// Display name
    pub name: String,
    /// Alternate names and codes this airline is known by
    pub aliases: Vec<String>,
    /// Where the submission package is sent
    pub channel: SubmissionChannel,
    /// Documents this airline requires beyond the statutory baseline
    pub required_documents: Vec<DocumentKind>,
    /// Claim fields this airline requires beyond passenger identity
    pub required_fields: Vec<String>,
    /// Days the airline usually takes to respond
    pub expected_response_days: u32,
    /// Follow-up cadence after filing
    pub follow_up: FollowUpSchedule,
}

impl AirlineProfile {
    /// Every document the claim must carry before filing with this airline:
    /// the statutory baseline plus the airline's extras.
    pub fn document_checklist(&self) -> Vec<DocumentKind> {
        let mut checklist = vec![DocumentKind::BoardingPass, DocumentKind::DisruptionProof];
        for doc in &self.required_documents {
            if !checklist.contains(doc) {
                checklist.push(*doc);
            }
        }
        checklist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_interval_fallbacks() {
        let schedule = FollowUpSchedule::new(vec![14, 21, 30]);
        assert_eq!(schedule.interval_at(0), Duration::days(14));
        assert_eq!(schedule.interval_at(2), Duration::days(30));
        // Exhausted schedules repeat the last entry
        assert_eq!(schedule.interval_at(9), Duration::days(30));

        let unconfigured = FollowUpSchedule::unconfigured();
        assert_eq!(
            unconfigured.interval_at(0),
            Duration::days(DEFAULT_FOLLOW_UP_DAYS as i64)
        );
    }

    #[test]
    fn test_document_checklist_dedupes_baseline() {
        let profile = AirlineProfile {
            code: "XX".to_string(),
            name: "Test Air".to_string(),
            aliases: vec![],
            channel: SubmissionChannel::Email {
                address: "claims@test.example".to_string(),
            },
            required_documents: vec![DocumentKind::BoardingPass, DocumentKind::IdDocument],
            required_fields: vec![],
            expected_response_days: 28,
            follow_up: FollowUpSchedule::unconfigured(),
        };

        let checklist = profile.document_checklist();
        assert_eq!(
            checklist,
            vec![
                DocumentKind::BoardingPass,
                DocumentKind::DisruptionProof,
                DocumentKind::IdDocument
            ]
        );
    }
}
