//! Service layer for background tasks.
//!
//! Query-side business logic lives in `db::services`; this module holds
//! the long-running tasks, currently the occupancy simulator.

pub mod simulator;

pub use simulator::{spawn_simulator, SimulatorConfig};
