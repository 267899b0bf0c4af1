//! Health monitor binary.
//!
//! Periodically probes the API's `/health` endpoint, appends each probe
//! to a CSV log, and logs uptime/latency statistics over the trailing
//! window. The ops dashboard renders the same CSV.
//!
//! # Environment Variables
//!
//! - `API_BASE`: Base URL of the API (default: http://127.0.0.1:8000)
//! - `PROBE_INTERVAL_SECS`: Seconds between probes (default: 5)
//! - `HEALTH_CSV`: Path of the CSV log (default: data/backend_health.csv)
//! - `METRICS_WINDOW_MINUTES`: Window for the logged statistics (default: 60)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use studymap_rust::ops::{append_probe, compute_metrics, probe_health, read_window, ProbeStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .init();

    let api_base = env::var("API_BASE").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let interval_secs: u64 = env::var("PROBE_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);
    let csv_path = PathBuf::from(
        env::var("HEALTH_CSV").unwrap_or_else(|_| "data/backend_health.csv".to_string()),
    );
    let window_minutes: i64 = env::var("METRICS_WINDOW_MINUTES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);

    info!(%api_base, interval_secs, csv = %csv_path.display(), "Health monitor started");

    let client = reqwest::Client::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    loop {
        ticker.tick().await;

        let result = probe_health(&client, &api_base).await;
        match result.status {
            ProbeStatus::Up => info!(
                latency_ms = result.latency_ms,
                http_status = result.http_status,
                "probe up"
            ),
            ProbeStatus::Down => warn!(error = result.error.as_deref(), "probe down"),
        }
        if let Err(e) = append_probe(&csv_path, &result) {
            warn!(error = %e, "failed to append probe result");
            continue;
        }

        match read_window(&csv_path, window_minutes, Utc::now()) {
            Ok(rows) => {
                let metrics = compute_metrics(&rows);
                info!(
                    uptime_pct = metrics.uptime_pct,
                    avg_latency_ms = metrics.avg_latency_ms,
                    errors = metrics.errors,
                    "window statistics"
                );
            }
            Err(e) => warn!(error = %e, "failed to read probe window"),
        }
    }
}
