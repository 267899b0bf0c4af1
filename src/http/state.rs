//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::FullRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Application configuration (threshold, heatmap window, CSV paths)
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and config.
    pub fn new(repository: Arc<dyn FullRepository>, config: AppConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}
