//! Apartment price CLI module
//!
//! Command-line interface for serving predictions and for running a single
//! prediction offline against a model file.

use clap::{Args, Parser, Subcommand};
use colored::*;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::config::ModelSettings;
use crate::inference::ModelInferenceService;
use crate::server::{run_pipeline, run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "apartment-price")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Apartment price prediction service")]
#[command(long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); defaults to LOG_LEVEL or info
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the prediction server
    Serve(ServeArgs),

    /// Predict a single apartment from a JSON object
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        /// Apartment features as a JSON object, or @path to read them from a file
        input: String,
    },
}

/// Overrides for the model location; unset values come from the environment
#[derive(Args, Debug, Default, Clone)]
pub struct ModelArgs {
    /// Directory containing the model file
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Model file name
    #[arg(long)]
    pub model_name: Option<String>,
}

impl ModelArgs {
    pub fn into_settings(self) -> ModelSettings {
        let mut settings = ModelSettings::default();
        if let Some(path) = self.model_path {
            settings.model_path = path;
        }
        if let Some(name) = self.model_name {
            settings.model_name = name;
        }
        settings
    }
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Server host
    #[arg(long)]
    pub host: Option<String>,

    #[command(flatten)]
    pub model: ModelArgs,
}

impl ServeArgs {
    pub fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        config.model = self.model.into_settings();
        config
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.into_config();
    let address = config.bind_address();

    println!();
    println!("  {}", "Apartment Price Server".white().bold());
    println!("  {}", dim(&format!("v{}", env!("CARGO_PKG_VERSION"))));
    println!("  {}", dim(&"─".repeat(56)));
    let model_file = config.model.model_path.join(&config.model.model_name);
    println!("  {}", kv("Model  ", &model_file.display().to_string()));
    println!("  {}", kv("Predict", &format!("http://{}/pred/", address)));
    println!("  {}", kv("Health ", &format!("http://{}/health", address)));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(config).await
}

pub fn cmd_predict(model: ModelArgs, input: &str) -> anyhow::Result<()> {
    let settings = model.into_settings();
    settings.validate()?;

    let mut inference = ModelInferenceService::new(&settings);
    inference.load_model()?;

    let raw = parse_input(input)?;
    let response = run_pipeline(&inference, &raw)?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Parse inline JSON, or the contents of a file when prefixed with `@`
fn parse_input(input: &str) -> anyhow::Result<Map<String, Value>> {
    let text = match input.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read input file '{}': {}", path, e))?,
        None => input.to_string(),
    };

    match serde_json::from_str::<Value>(&text)? {
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("Input must be a JSON object with apartment features"),
    }
}
