mod cli;
mod config;
mod paths;
mod server;
mod usage;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cli::commands;
use cli::{Cli, Commands};
use config::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.global.config.as_deref())?;

    match cli.command {
        None => commands::serve::run(&cli.global, Default::default(), config).await,
        Some(Commands::Serve(args)) => commands::serve::run(&cli.global, args, config).await,
        Some(Commands::Usage { json }) => commands::usage::run(&cli.global, config, json).await,
        Some(Commands::Sessions { limit, json }) => {
            commands::sessions::run(&cli.global, config, limit, json).await
        }
        Some(Commands::Doctor) => commands::doctor::run(&cli.global, config).await,
    }
}

/// Log to stderr so `--json` output on stdout stays clean. `RUST_LOG` overrides.
fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
