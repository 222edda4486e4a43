use std::io;

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vital_signs_cli::commands::{execute, Cli};
use vital_signs_cli::config::AppConfig;
use vital_signs_domain::services::VitalSignService;

/// The main entry point for the vital-signs CLI
///
/// This function:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for logging on stderr
/// 3. Loads configuration from the environment
/// 4. Runs the requested command and prints its JSON output
fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    if dotenv().is_err() {
        eprintln!("Warning: .env file not found or couldn't be read. Using environment variables.");
    }

    let cli = Cli::parse();

    // Initialize tracing for structured logging; stdout is reserved for output
    let env_filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::uptime())
            .with_writer(io::stderr))
        .with(env_filter)
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(
        temperature_unit = %config.temperature_unit,
        require_confirmation = config.require_confirmation,
        "Loaded configuration"
    );

    let service = VitalSignService::new().with_confirmation_required(config.require_confirmation);

    let output = execute(&cli.command, &config, &service, &mut io::stdin())?;
    println!("{}", output.render(cli.pretty)?);

    if !output.success {
        error!("Command did not succeed");
        std::process::exit(1);
    }
    Ok(())
}
