//! Occupancy simulator.
//!
//! A periodic task emulating live sensor feeds: every tick it applies a
//! random delta to each room's occupancy level, clamps the result to
//! 0..=100 and appends a history record. The repository is the only
//! shared state, so no coordination beyond its locking is needed.

use std::sync::Arc;
use std::time::Duration;

use rand::prelude::*;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::db::repository::{FullRepository, RepositoryResult};

/// Simulator tuning knobs.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Time between ticks.
    pub interval: Duration,
    /// Largest per-tick change to a room's level, in either direction.
    pub max_delta: i32,
    /// Seed for the delta RNG; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(4),
            max_delta: 25,
            seed: None,
        }
    }
}

/// Run one simulator tick over every room.
///
/// # Returns
/// The number of rooms updated.
pub async fn tick(
    repo: &dyn FullRepository,
    rng: &mut StdRng,
    max_delta: i32,
) -> RepositoryResult<usize> {
    let rooms = repo.list_rooms().await?;
    let mut updated = 0;
    for room in &rooms {
        let delta = rng.gen_range(-max_delta..=max_delta);
        let level = (room.current_level + delta).clamp(0, 100);
        repo.apply_occupancy(&room.room_id, level).await?;
        updated += 1;
    }
    Ok(updated)
}

async fn run(repo: Arc<dyn FullRepository>, config: SimulatorConfig) {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        match tick(repo.as_ref(), &mut rng, config.max_delta).await {
            Ok(updated) => debug!(updated, "simulator tick"),
            Err(e) => warn!(error = %e, "simulator tick failed"),
        }
    }
}

/// Spawn the simulator as a background tokio task.
pub fn spawn_simulator(repo: Arc<dyn FullRepository>, config: SimulatorConfig) -> JoinHandle<()> {
    tokio::spawn(run(repo, config))
}
