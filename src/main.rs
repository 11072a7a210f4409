use anyhow::Result;
use bukidmate::{commands, logging, Config};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bukidmate")]
#[command(version)]
#[command(about = "Chat with BukidMate for crop price forecasts", long_about = None)]
struct Cli {
    /// Forecasting backend origin, e.g. http://localhost:8000
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Config file to use instead of ~/.bukidmate/config.toml
    #[arg(long, global = true, env = "BUKIDMATE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message, e.g. `ask "Central Luzon, Tomato"`, and print the reply
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// List the known regions
    Regions,
    /// List the known crops
    Crops,
    /// Check whether the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }

    match cli.command {
        None => {
            let _guard = logging::init_file(&Config::home_dir()?)?;
            commands::run_chat(config).await
        }
        Some(command) => {
            logging::init_stderr();
            match command {
                Commands::Ask { text } => commands::ask(&config, &text.join(" ")).await,
                Commands::Regions => {
                    commands::list_regions();
                    Ok(())
                }
                Commands::Crops => {
                    commands::list_crops();
                    Ok(())
                }
                Commands::Health => commands::health(&config).await,
            }
        }
    }
}
