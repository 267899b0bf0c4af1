//! Operations tooling: health monitoring for the running API.

pub mod monitor;

pub use monitor::{
    append_probe, compute_metrics, probe_health, read_window, HealthMetrics, ProbeResult,
    ProbeStatus,
};
