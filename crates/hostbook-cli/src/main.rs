//! hostbook CLI - Command-line interface for hostbook
//!
//! Provides `hostbook types`, `hostbook profile` and `hostbook tree`.

mod app;
mod commands;
mod terminal;

use clap::{Parser, Subcommand};
use std::error::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use hostbook_core::config::{self, AppConfig};

use app::App;
use commands::profile::ProfileCommands;
use commands::tree::TreeCommands;

/// Environment variable holding the log filter
const LOG_ENV: &str = "HOSTBOOK_LOG";

#[derive(Parser)]
#[command(name = "hostbook")]
#[command(about = "hostbook - connection profile manager")]
#[command(version)]
struct Cli {
    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered profile types and their fields
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommands,
    },
    /// Manage session trees
    Tree {
        #[command(subcommand)]
        action: TreeCommands,
    },
}

fn init_tracing(config_filter: Option<&str>) {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    let env_filter = match std::env::var(LOG_ENV) {
        Ok(filter) => builder.parse_lossy(filter),
        Err(_) => builder.parse_lossy(config_filter.unwrap_or_default()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();

    let data_dir = config::data_dir();
    let config = match AppConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_filter.as_deref());

    if let Err(e) = run(cli, &config, data_dir) {
        if !commands::already_reported(e.as_ref()) {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &AppConfig, data_dir: std::path::PathBuf) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Types { json } => {
            let (catalog, _) = config.type_catalog();
            commands::types::execute(&catalog, json)
        }
        Commands::Profile { action } => {
            let mut app = App::open(config, data_dir)?;
            commands::profile::execute(action, &mut app, cli.yes)
        }
        Commands::Tree { action } => {
            let app = App::open(config, data_dir)?;
            commands::tree::execute(action, &app)
        }
    }
}
