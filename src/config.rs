//! Application configuration file support.
//!
//! Configuration is read from a `studymap.toml` file, with environment
//! variable overrides for the server bind address. Every field has a
//! default so a missing file yields a fully usable configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::repository::RepositoryError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub simulator: SimulatorSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Seed data locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_rooms_csv")]
    pub rooms_csv: PathBuf,
    #[serde(default = "default_timetable_csv")]
    pub timetable_csv: PathBuf,
    /// Seed for the sample data generator when the CSVs are missing.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

/// Occupancy simulator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorSettings {
    #[serde(default = "default_simulator_enabled")]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Largest per-tick change to a room's occupancy level.
    #[serde(default = "default_max_delta")]
    pub max_delta: i32,
}

/// Aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    /// Level above which a room counts as occupied.
    #[serde(default = "default_occupancy_threshold")]
    pub occupancy_threshold: i32,
    /// Default heatmap window when the query does not specify one.
    #[serde(default = "default_heatmap_window")]
    pub heatmap_window_minutes: i64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_rooms_csv() -> PathBuf {
    PathBuf::from("data/rooms.csv")
}

fn default_timetable_csv() -> PathBuf {
    PathBuf::from("data/timetable.csv")
}

fn default_seed() -> u64 {
    1
}

fn default_simulator_enabled() -> bool {
    true
}

fn default_interval_secs() -> u64 {
    4
}

fn default_max_delta() -> i32 {
    25
}

fn default_occupancy_threshold() -> i32 {
    crate::api::DEFAULT_OCCUPANCY_THRESHOLD
}

fn default_heatmap_window() -> i64 {
    15
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            rooms_csv: default_rooms_csv(),
            timetable_csv: default_timetable_csv(),
            seed: default_seed(),
        }
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            enabled: default_simulator_enabled(),
            interval_secs: default_interval_secs(),
            max_delta: default_max_delta(),
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            occupancy_threshold: default_occupancy_threshold(),
            heatmap_window_minutes: default_heatmap_window(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// Searches for `studymap.toml` in the current directory and its
    /// parent. Falls back to defaults if no file is found.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("studymap.toml"),
            PathBuf::from("../studymap.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Apply `HOST` and `PORT` environment overrides.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = env::var("PORT").ok().and_then(|s| s.parse().ok()) {
            self.server.port = port;
        }
        self
    }

    /// Socket address string for the HTTP server.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
