//! Linkrec - LinkedIn content analyzer and recommendations CLI
//!
#![doc = "Linkrec - LinkedIn content analyzer and recommendations CLI"]
#![doc = "Main entry point for the linkrec command."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use linkrec::cli::Cli;
use linkrec::commands::{self, notify, Context};
use linkrec::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = match Config::load(config_path, &cli).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            notify::error(&e, "Invalid configuration");
            std::process::exit(2);
        }
    };

    let fallback = commands::fallback_message(&cli.command);
    let outcome = match Context::new(config).await {
        Ok(ctx) => commands::dispatch(&ctx, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        notify::error(&e, fallback);
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr so `--json` output on stdout stays clean.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "linkrec=debug" } else { "linkrec=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}
