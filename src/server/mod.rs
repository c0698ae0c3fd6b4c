//! Prediction server module
//!
//! HTTP front end for the apartment price model. Serves single predictions
//! from query parameters or JSON bodies plus a health endpoint.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::{run_pipeline, PredictionResponse};
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ModelSettings;
use crate::inference::ModelInferenceService;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model: ModelSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            model: ModelSettings::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the model and start the server with the given configuration.
///
/// Returns an error without binding if the model cannot be loaded.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        model_path = %config.model.model_path.display(),
        model_name = %config.model.model_name,
        started_at = %start_time.to_rfc3339(),
        "Initializing prediction server"
    );

    config.model.validate()?;

    let mut inference = ModelInferenceService::new(&config.model);
    inference.load_model()?;

    let state = Arc::new(AppState::new(config.clone(), inference));
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        pid = std::process::id(),
        "Server listening and ready to accept connections"
    );
    info!(url = %format!("http://{}/pred/", addr), "Prediction endpoint available");
    info!(url = %format!("http://{}/health", addr), "Health endpoint available");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
