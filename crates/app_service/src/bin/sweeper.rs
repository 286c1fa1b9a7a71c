//! Refund sweep worker
//!
//! Runs the scheduled refund sweep on an interval so the time-based
//! guarantee triggers (48-hour filing deadline, 24-hour request window)
//! fire even when nothing else happens to a claim.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-sweeper
//!
//! # Run with environment variables
//! CLAIMS_SWEEP_INTERVAL_SECS=60 CLAIMS_LOG_LEVEL=debug cargo run --bin claims-sweeper
//! ```
//!
//! # Environment Variables
//!
//! * `CLAIMS_SWEEP_INTERVAL_SECS` - Seconds between sweep passes (default: 300)
//! * `CLAIMS_FILING_DEADLINE_HOURS` - Filing deadline before the guarantee fires (default: 48)
//! * `CLAIMS_REFUND_REQUEST_WINDOW_HOURS` - Customer request window (default: 24)
//! * `CLAIMS_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::sync::Arc;

use chrono::Utc;

use airline_directory::builtin_directory;
use app_service::{
    init_tracing, CannedFlightProvider, ClaimService, InMemoryClaimStore, RecordingNotifier,
    RecordingPaymentPort, ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ServiceConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level);

    tracing::info!(
        interval_secs = config.sweep_interval_secs,
        filing_deadline_hours = config.filing_deadline_hours,
        "starting refund sweeper"
    );

    // Demo wiring: in-memory adapters stand in for the record store, the
    // payment processor, and the notifier. Production deployments replace
    // these with their real adapters.
    let service = ClaimService::new(
        &config,
        Arc::new(builtin_directory().clone()),
        Arc::new(InMemoryClaimStore::new()),
        Arc::new(RecordingNotifier::new()),
        Arc::new(RecordingPaymentPort::new()),
        Arc::new(CannedFlightProvider::new("flightstats")),
        Arc::new(CannedFlightProvider::new("aviation-edge")),
    );

    let mut interval = tokio::time::interval(config.sweep_interval());
    loop {
        tokio::select! {
            _ = interval.tick() => {
                match service.run_sweep(Utc::now()).await {
                    Ok(report) => tracing::info!(
                        evaluated = report.evaluated,
                        refunds_issued = report.refunds_issued,
                        failures = report.failures,
                        "sweep pass finished"
                    ),
                    Err(err) => tracing::error!(error = %err, "sweep pass failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received Ctrl+C, shutting down");
                break;
            }
        }
    }

    Ok(())
}
