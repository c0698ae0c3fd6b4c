//! Apartment price prediction service - Main Entry Point

use apartment_price::cli::{cmd_predict, cmd_serve, Cli, Commands};
use apartment_price::config::LoggerSettings;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = match cli.log_level {
        Some(level) => LoggerSettings::new(level),
        None => LoggerSettings::default(),
    };
    logger.init()?;

    match cli.command {
        Some(Commands::Predict { model, input }) => {
            cmd_predict(model, &input)?;
        }
        Some(Commands::Serve(args)) => {
            cmd_serve(args).await?;
        }
        None => {
            cmd_serve(Default::default()).await?;
        }
    }

    Ok(())
}
