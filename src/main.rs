//! Savespot CLI - save places and launch navigation to them

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use savespot::config::{self, SavespotConfig};
use savespot::storage::{DestinationStore, StoreHandle, StoreLocation};
use savespot::{ui, Platform};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "savespot")]
#[command(version)]
#[command(about = "Save places as destinations and navigate to them later")]
#[command(long_about = r#"
Savespot keeps a local list of places you want to go and hands them to your
maps app for turn-by-turn directions.

Example usage:
  savespot add --name "Local Gym" --address "456 Fitness Ave" --lat 42.3505 --lng -71.0765
  savespot list
  savespot search gym
  savespot navigate <id>
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database directory
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Save a new destination
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        address: String,

        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Pick a place-search result (JSON) and confirm it as a destination
    Pick {
        /// File holding the place details; `-` reads stdin
        #[arg(default_value = "-")]
        place: PathBuf,

        /// Save without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// List saved destinations, newest first
    List,

    /// Show one destination
    Show {
        id: String,
    },

    /// Find destinations whose name contains a term
    Search {
        term: String,
    },

    /// Change some fields of a destination
    Update {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        address: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// Delete a destination
    Delete {
        id: String,
    },

    /// Open turn-by-turn navigation to a destination
    Navigate {
        id: String,

        /// Target platform (ios, android, web)
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Print the URL instead of opening it
        #[arg(long)]
        print: bool,
    },

    /// Save the sample destinations
    Seed,
}

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Write a JSON success envelope (JSON mode only)
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };

    match run(cli, output_mode).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "command failed");
            let open_failed = e
                .downcast_ref::<savespot::Error>()
                .is_some_and(savespot::Error::is_open_error);
            if open_failed {
                ui::error("Could not open your saved destinations. Please try again.");
            } else {
                ui::error(&format!("Something went wrong: {}", e));
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();
    let cwd = std::env::current_dir()?;
    let database = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database_path_in(&cwd));

    if let Commands::Init { force } = cli.command {
        let config_path = cli.config.unwrap_or_else(config::default_config_path);
        return commands::run_init(output_mode, &config_path, &database, force);
    }

    let handle = Arc::new(StoreHandle::new(StoreLocation::file(&database)));
    let store = DestinationStore::new(Arc::clone(&handle));

    let result = dispatch(&store, &config, cli.command, output_mode).await;
    let released = handle.release().await;

    result?;
    released?;
    Ok(())
}

async fn dispatch(
    store: &DestinationStore,
    config: &SavespotConfig,
    command: Commands,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        Commands::Init { .. } => Ok(()),
        Commands::Add { name, address, lat, lng } => {
            commands::run_add(store, output_mode, name, address, lat, lng).await
        }
        Commands::Pick { place, yes } => commands::run_pick(store, output_mode, &place, yes).await,
        Commands::List => commands::run_list(store, output_mode).await,
        Commands::Show { id } => commands::run_show(store, output_mode, &id).await,
        Commands::Search { term } => commands::run_search(store, output_mode, &term).await,
        Commands::Update { id, name, address, lat, lng } => {
            let patch = savespot::DestinationPatch {
                name,
                address,
                latitude: lat,
                longitude: lng,
            };
            commands::run_update(store, output_mode, &id, patch).await
        }
        Commands::Delete { id } => commands::run_delete(store, output_mode, &id).await,
        Commands::Navigate { id, platform, print } => {
            let platform = platform.unwrap_or_else(|| config.platform());
            commands::run_navigate(store, output_mode, &id, platform, print).await
        }
        Commands::Seed => commands::run_seed(store, output_mode).await,
    }
}
