//! Temporal helpers for flight schedules and elapsed-time windows
//!
//! This module provides:
//! - A timezone wrapper for interpreting scheduled flight times in local time
//! - Delay computation between scheduled and actual timestamps
//! - Elapsed-time windows used by time-based business triggers

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use std::str::FromStr;

/// Timezone wrapper for airport-local schedule times
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Interprets a local wall-clock time on the given date as UTC
    pub fn local_to_utc(
        &self,
        date: NaiveDate,
        hour: u32,
        minute: u32,
    ) -> Result<DateTime<Utc>, TemporalError> {
        date.and_hms_opt(hour, minute, 0)
            .ok_or(TemporalError::InvalidLocalTime { hour, minute })?
            .and_local_timezone(self.0)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or(TemporalError::AmbiguousLocalTime { hour, minute })
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid local time {hour:02}:{minute:02}")]
    InvalidLocalTime { hour: u32, minute: u32 },

    #[error("Ambiguous local time {hour:02}:{minute:02} (DST fold)")]
    AmbiguousLocalTime { hour: u32, minute: u32 },

    #[error("Invalid window: start {start} must be before end {end}")]
    InvalidWindow { start: String, end: String },
}

/// Computes the delay in whole minutes between a scheduled and an actual
/// timestamp. An early arrival yields a negative value.
pub fn delay_minutes(scheduled: DateTime<Utc>, actual: DateTime<Utc>) -> i64 {
    (actual - scheduled).num_minutes()
}

/// A half-open time window `[start, start + length)` anchored at an event,
/// used for deadline checks such as "within 24 hours of payment capture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElapsedWindow {
    /// Anchor timestamp (inclusive)
    pub start: DateTime<Utc>,
    /// Window length in seconds
    pub length_secs: i64,
}

impl ElapsedWindow {
    /// Creates a window of the given duration starting at `start`
    pub fn new(start: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start,
            length_secs: length.num_seconds(),
        }
    }

    /// Returns the exclusive end of the window
    pub fn end(&self) -> DateTime<Utc> {
        self.start + Duration::seconds(self.length_secs)
    }

    /// Returns true if the timestamp falls inside the window
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end()
    }

    /// Returns true if the window has fully elapsed by the given instant
    pub fn elapsed_by(&self, now: DateTime<Utc>) -> bool {
        now >= self.end()
    }
}
