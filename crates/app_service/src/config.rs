//! Service configuration

use std::time::Duration;

use serde::Deserialize;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Per-provider flight lookup timeout in seconds
    pub provider_timeout_secs: u64,
    /// Lookup cache capacity in entries
    pub cache_capacity: usize,
    /// Lookup cache entry lifetime in seconds
    pub cache_ttl_secs: u64,
    /// Interval between refund sweep passes in seconds
    pub sweep_interval_secs: u64,
    /// Hours the service has to file before the refund guarantee fires
    pub filing_deadline_hours: i64,
    /// Hours after capture during which a customer request triggers a refund
    pub refund_request_window_hours: i64,
    /// Log level
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: 10,
            cache_capacity: 1024,
            cache_ttl_secs: 600,
            sweep_interval_secs: 300,
            filing_deadline_hours: 48,
            refund_request_window_hours: 24,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from environment variables prefixed `CLAIMS_`
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("CLAIMS"))
            .build()?
            .try_deserialize()
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn filing_deadline(&self) -> chrono::Duration {
        chrono::Duration::hours(self.filing_deadline_hours)
    }

    pub fn refund_request_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.refund_request_window_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_guarantee_windows() {
        let config = ServiceConfig::default();
        assert_eq!(config.filing_deadline(), chrono::Duration::hours(48));
        assert_eq!(config.refund_request_window(), chrono::Duration::hours(24));
        assert_eq!(config.provider_timeout(), Duration::from_secs(10));
    }
}
