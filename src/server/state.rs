//! Application state management

use crate::inference::ModelInferenceService;

use super::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub inference: ModelInferenceService,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: ServerConfig, inference: ModelInferenceService) -> Self {
        Self {
            config,
            inference,
            started_at: chrono::Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }
}
