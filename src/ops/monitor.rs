//! Health monitor core: probe the API's health endpoint, append results
//! to a CSV log and compute time-series statistics over a window.
//!
//! The CSV log is the hand-off point to the ops dashboard; the metrics
//! here are what it renders.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;
use std::time::Instant;

/// Probe timeout.
pub const PROBE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(3);

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
}

/// One row of the health log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub timestamp: DateTime<Utc>,
    pub status: ProbeStatus,
    pub latency_ms: Option<f64>,
    pub http_status: Option<u16>,
    pub error: Option<String>,
}

/// Aggregated health statistics over a window of probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub uptime_pct: f64,
    /// Mean latency over successful probes only.
    pub avg_latency_ms: Option<f64>,
    pub errors: usize,
    /// Most recent probe that observed the service down.
    pub last_down_at: Option<DateTime<Utc>>,
}

/// Probe `GET {base}/health` once.
///
/// Never fails: an unreachable service is a `Down` result, not an error.
pub async fn probe_health(client: &reqwest::Client, api_base: &str) -> ProbeResult {
    let url = format!("{}/health", api_base.trim_end_matches('/'));
    let started = Instant::now();
    match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => {
            let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
            let code = response.status().as_u16();
            if response.status().is_success() {
                ProbeResult {
                    timestamp: Utc::now(),
                    status: ProbeStatus::Up,
                    latency_ms: Some(latency_ms),
                    http_status: Some(code),
                    error: None,
                }
            } else {
                ProbeResult {
                    timestamp: Utc::now(),
                    status: ProbeStatus::Down,
                    latency_ms: Some(latency_ms),
                    http_status: Some(code),
                    error: Some(format!("HTTP {}", code)),
                }
            }
        }
        Err(e) => ProbeResult {
            timestamp: Utc::now(),
            status: ProbeStatus::Down,
            latency_ms: Some(started.elapsed().as_secs_f64() * 1000.0),
            http_status: None,
            error: Some(e.to_string()),
        },
    }
}

/// Append a probe result to the CSV log, writing the header on first use.
pub fn append_probe(path: &Path, result: &ProbeResult) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let is_new = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    writer.serialize(result)?;
    writer.flush()?;
    Ok(())
}

/// Read log rows within the last `minutes` before `now`.
///
/// Rows that fail to parse are skipped; a missing log file yields an
/// empty window.
pub fn read_window(path: &Path, minutes: i64, now: DateTime<Utc>) -> Result<Vec<ProbeResult>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let cutoff = now - Duration::minutes(minutes);
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = reader
        .deserialize::<ProbeResult>()
        .filter_map(|row| row.ok())
        .filter(|row| row.timestamp >= cutoff)
        .collect();
    Ok(rows)
}

/// Compute uptime, latency and error statistics over a window of probes.
pub fn compute_metrics(rows: &[ProbeResult]) -> HealthMetrics {
    if rows.is_empty() {
        return HealthMetrics {
            uptime_pct: 0.0,
            avg_latency_ms: None,
            errors: 0,
            last_down_at: None,
        };
    }

    let ups = rows.iter().filter(|r| r.status == ProbeStatus::Up).count();
    let uptime_pct = ups as f64 / rows.len() as f64 * 100.0;

    let latencies: Vec<f64> = rows
        .iter()
        .filter(|r| r.status == ProbeStatus::Up)
        .filter_map(|r| r.latency_ms)
        .collect();
    let avg_latency_ms = if latencies.is_empty() {
        None
    } else {
        Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
    };

    let errors = rows
        .iter()
        .filter(|r| r.status == ProbeStatus::Down)
        .count();
    let last_down_at = rows
        .iter()
        .rev()
        .find(|r| r.status == ProbeStatus::Down)
        .map(|r| r.timestamp);

    HealthMetrics {
        uptime_pct,
        avg_latency_ms,
        errors,
        last_down_at,
    }
}
