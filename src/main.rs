use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use souschef::app::{handle_fatal_error, initialize_app, AppConfig};
use souschef::server::ApiServer;

/// Generate recipes from the ingredients you have
#[derive(Parser)]
#[command(name = "souschef")]
#[command(about = "Recipe generation service", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default command)
    Serve {
        /// Address to bind, overrides the configuration
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        handle_fatal_error(e, verbose);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref(), cli.verbose)?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => {
            let config = match bind {
                Some(bind) => config.with_bind_address(bind),
                None => config,
            };

            let context = initialize_app(&config).await?;
            ApiServer::new(context, config.bind_address.clone())
                .run(shutdown_signal())
                .await
        }
        Commands::Config => {
            let mut shown = config.clone();
            if shown.model.api_key.is_some() {
                shown.model.api_key = Some("********".to_string());
            }
            shown.identity = shown.identity.masked();
            println!("{}", toml::to_string_pretty(&shown)?);
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
