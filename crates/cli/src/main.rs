mod commands;
mod fixtures;
mod logging;

use clap::{Parser, Subcommand};
use commands::*;
use logging::LogFormat;

#[derive(Parser)]
#[command(name = "automap")]
#[command(about = "Convention-based type registration harness")]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value = "compact", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the smoke scenario and check every registration
    Smoke {
        /// Behavior flags, separated by `,` or `|`
        #[arg(long)]
        behaviors: Option<String>,

        /// Run every combination of behavior flags
        #[arg(long, conflicts_with = "behaviors")]
        all: bool,
    },

    /// Register the smoke types and print what was added
    Map {
        /// YAML options file (defaults to AUTOMAP_BEHAVIORS)
        #[arg(long)]
        config: Option<std::path::PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format)?;

    match cli.command {
        Commands::Smoke { behaviors, all } => {
            smoke::run(behaviors.as_deref(), all)?;
        }
        Commands::Map { config, json } => {
            map::run(config.as_deref(), json)?;
        }
    }

    Ok(())
}
