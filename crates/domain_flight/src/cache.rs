//! Bounded TTL cache for flight lookups
//!
//! Identical lookups inside the TTL are served from memory to avoid
//! redundant provider calls. The cache is owned and injected by the lookup
//! service's caller, never accessed as ambient global state.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::DashMap;

use crate::reconcile::ReconciledFlightRecord;

type CacheKey = (String, NaiveDate);

#[derive(Debug, Clone)]
struct CacheEntry {
    record: ReconciledFlightRecord,
    inserted_at: Instant,
}

/// Concurrent cache of reconciled lookups, bounded by entry count and age
#[derive(Debug)]
pub struct LookupCache {
    entries: DashMap<CacheKey, CacheEntry>,
    capacity: usize,
    ttl: Duration,
}

impl LookupCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    fn key(flight_number: &str, date: NaiveDate) -> CacheKey {
        (flight_number.trim().to_ascii_uppercase(), date)
    }

    /// Returns the cached record if present and not expired
    pub fn get(&self, flight_number: &str, date: NaiveDate) -> Option<ReconciledFlightRecord> {
        let key = Self::key(flight_number, date);
        let expired = match self.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.record.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(&key);
        }
        None
    }

    /// Stores a record, evicting expired entries first and then the oldest
    /// entry if the cache is still at capacity
    pub fn insert(&self, flight_number: &str, date: NaiveDate, record: ReconciledFlightRecord) {
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);

        if self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().inserted_at)
                .map(|entry| entry.key().clone());
            if let Some(key) = oldest {
                self.entries.remove(&key);
            }
        }

        self.entries.insert(
            Self::key(flight_number, date),
            CacheEntry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
