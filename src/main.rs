// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use jetmirror::config::{Config, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "jetmirror")]
#[command(author, version, about = "Offline mirror for JetBrains IDE plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror all configured plugins and regenerate the repository index
    Sync {
        /// Configuration file path
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
    /// Serve the mirror directory over HTTP
    Serve {
        /// Configuration file path
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Sync { config }) => {
            info!("Loading configuration from {}", config.display());
            let config = Config::load(&config)?;

            jetmirror::sync_plugins(&config)?;
            println!("Sync completed successfully!");
            Ok(())
        }
        Some(Commands::Serve { config }) => {
            let config = Config::load(&config)?;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(jetmirror::server::serve(
                config.output_dir.clone(),
                config.server_port,
            ))?;
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Jetmirror v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'jetmirror --help' for usage information");
            Ok(())
        }
    }
}
