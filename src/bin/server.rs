//! Study Map HTTP Server Binary
//!
//! This is the main entry point for the Study Map REST API server.
//! It loads the configuration, seeds and populates the repository, starts
//! the occupancy simulator, and serves the HTTP router.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin studymap-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `RUST_LOG`: Log level (default: info)
//!
//! Everything else comes from `studymap.toml`, see `config::AppConfig`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use studymap_rust::config::AppConfig;
use studymap_rust::db::repository::FullRepository;
use studymap_rust::db::LocalRepository;
use studymap_rust::http::{create_router, AppState};
use studymap_rust::seed::{populate_from_csv, write_sample_data};
use studymap_rust::services::{spawn_simulator, SimulatorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting Study Map HTTP Server");

    let config = AppConfig::from_default_location()
        .map_err(|e| anyhow::anyhow!(e))?
        .apply_env_overrides();

    // Generate the sample dataset on first run.
    if !config.data.rooms_csv.exists() || !config.data.timetable_csv.exists() {
        let (rooms, entries) = write_sample_data(
            &config.data.rooms_csv,
            &config.data.timetable_csv,
            config.data.seed,
        )?;
        info!(rooms, entries, seed = config.data.seed, "Generated sample CSV data");
    }

    let repository: Arc<dyn FullRepository> = Arc::new(LocalRepository::new());
    let dataset = populate_from_csv(
        repository.as_ref(),
        &config.data.rooms_csv,
        &config.data.timetable_csv,
    )
    .await
    .map_err(|e| anyhow::anyhow!(e))?;
    info!(
        rooms = dataset.rooms,
        timetable_entries = dataset.timetable_entries,
        checksum = %dataset.checksum,
        "Dataset loaded"
    );

    if config.simulator.enabled {
        let sim_config = SimulatorConfig {
            interval: Duration::from_secs(config.simulator.interval_secs),
            max_delta: config.simulator.max_delta,
            seed: None,
        };
        spawn_simulator(Arc::clone(&repository), sim_config);
        info!(
            interval_secs = config.simulator.interval_secs,
            max_delta = config.simulator.max_delta,
            "Occupancy simulator started"
        );
    }

    let addr: SocketAddr = config.bind_addr().parse()?;
    let state = AppState::new(repository, config);
    let app = create_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
