//! Dual-provider flight lookup
//!
//! Queries two independent providers concurrently, each under its own
//! timeout, and reconciles whatever subset returns. A slow or failing
//! provider degrades the result to single-source; only both failing
//! surfaces `NoFlightData`.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::cache::LookupCache;
use crate::error::FlightError;
use crate::observation::FlightObservation;
use crate::ports::FlightDataProvider;
use crate::reconcile::{reconcile, ReconciledFlightRecord};

/// Default per-provider timeout
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Flight lookup service over a provider pair and an injected cache
pub struct FlightLookupService {
    primary: Arc<dyn FlightDataProvider>,
    secondary: Arc<dyn FlightDataProvider>,
    cache: Arc<LookupCache>,
    provider_timeout: Duration,
}

impl FlightLookupService {
    pub fn new(
        primary: Arc<dyn FlightDataProvider>,
        secondary: Arc<dyn FlightDataProvider>,
        cache: Arc<LookupCache>,
    ) -> Self {
        Self {
            primary,
            secondary,
            cache,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Looks up and reconciles flight status for one flight and date
    pub async fn lookup(
        &self,
        flight_number: &str,
        date: NaiveDate,
    ) -> Result<ReconciledFlightRecord, FlightError> {
        if let Some(hit) = self.cache.get(flight_number, date) {
            return Ok(hit);
        }

        let (first, second) = tokio::join!(
            self.query(self.primary.as_ref(), flight_number, date),
            self.query(self.secondary.as_ref(), flight_number, date),
        );

        let observations: Vec<FlightObservation> =
            [first, second].into_iter().flatten().collect();

        let record = reconcile(&observations)?;
        info!(
            flight = %record.flight,
            sources = record.sources.len(),
            confidence = record.confidence,
            "flight lookup reconciled"
        );

        self.cache.insert(flight_number, date, record.clone());
        Ok(record)
    }

    /// Queries one provider under the per-provider timeout; failures and
    /// timeouts degrade to `None` rather than failing the lookup.
    async fn query(
        &self,
        provider: &dyn FlightDataProvider,
        flight_number: &str,
        date: NaiveDate,
    ) -> Option<FlightObservation> {
        match tokio::time::timeout(self.provider_timeout, provider.lookup(flight_number, date))
            .await
        {
            Ok(Ok(observation)) => Some(observation),
            Ok(Err(err)) => {
                warn!(
                    provider = provider.source(),
                    flight = flight_number,
                    error = %err,
                    "flight data provider failed"
                );
                None
            }
            Err(_) => {
                warn!(
                    provider = provider.source(),
                    flight = flight_number,
                    timeout_ms = self.provider_timeout.as_millis() as u64,
                    "flight data provider timed out"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use core_kernel::{DomainPort, PortError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::observation::FlightDesignator;
    use crate::reconcile::SourceAgreement;

    struct StubProvider {
        name: &'static str,
        delay: i64,
        confidence: f64,
        fail: bool,
        latency: Duration,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn ok(name: &'static str, delay: i64, confidence: f64) -> Self {
            Self {
                name,
                delay,
                confidence,
                fail: false,
                latency: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::ok(name, 0, 0.0)
            }
        }

        fn slow(name: &'static str, latency: Duration) -> Self {
            Self {
                latency,
                ..Self::ok(name, 30, 0.9)
            }
        }
    }

    impl DomainPort for StubProvider {}

    #[async_trait]
    impl FlightDataProvider for StubProvider {
        fn source(&self) -> &str {
            self.name
        }

        async fn lookup(
            &self,
            flight_number: &str,
            date: NaiveDate,
        ) -> Result<FlightObservation, PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            if self.fail {
                return Err(PortError::connection("provider unreachable"));
            }
            let (carrier, number) = flight_number.split_at(2);
            Ok(FlightObservation::new(
                FlightDesignator::new(carrier, number, date),
                self.delay,
                false,
                self.confidence,
                self.name,
                Utc::now(),
            ))
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn cache() -> Arc<LookupCache> {
        Arc::new(LookupCache::new(16, Duration::from_secs(600)))
    }

    #[tokio::test]
    async fn test_both_providers_corroborate() {
        let service = FlightLookupService::new(
            Arc::new(StubProvider::ok("primary", 200, 0.8)),
            Arc::new(StubProvider::ok("secondary", 205, 0.7)),
            cache(),
        );

        let record = service.lookup("LH1234", date()).await.unwrap();
        assert_eq!(record.agreement, SourceAgreement::Corroborated);
        assert_eq!(record.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_one_provider_failure_degrades_to_single_source() {
        let service = FlightLookupService::new(
            Arc::new(StubProvider::ok("primary", 200, 0.8)),
            Arc::new(StubProvider::failing("secondary")),
            cache(),
        );

        let record = service.lookup("LH1234", date()).await.unwrap();
        assert_eq!(record.agreement, SourceAgreement::SingleSource);
        assert_eq!(record.sources, vec!["primary".to_string()]);
    }

    #[tokio::test]
    async fn test_both_providers_failing_is_no_flight_data() {
        let service = FlightLookupService::new(
            Arc::new(StubProvider::failing("primary")),
            Arc::new(StubProvider::failing("secondary")),
            cache(),
        );

        let result = service.lookup("LH1234", date()).await;
        assert!(matches!(result, Err(FlightError::NoFlightData)));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out_independently() {
        let service = FlightLookupService::new(
            Arc::new(StubProvider::ok("primary", 200, 0.8)),
            Arc::new(StubProvider::slow("secondary", Duration::from_millis(500))),
            cache(),
        )
        .with_provider_timeout(Duration::from_millis(50));

        let record = service.lookup("LH1234", date()).await.unwrap();
        assert_eq!(record.agreement, SourceAgreement::SingleSource);
        assert_eq!(record.sources, vec!["primary".to_string()]);
    }

    #[tokio::test]
    async fn test_repeat_lookup_is_served_from_cache() {
        let primary = Arc::new(StubProvider::ok("primary", 200, 0.8));
        let secondary = Arc::new(StubProvider::ok("secondary", 200, 0.8));
        let service =
            FlightLookupService::new(primary.clone(), secondary.clone(), cache());

        service.lookup("LH1234", date()).await.unwrap();
        service.lookup("LH1234", date()).await.unwrap();

        assert_eq!(primary.calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 1);
    }
}
