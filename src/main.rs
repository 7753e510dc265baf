use agrosmart::Config;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Fertilizer recommendations and carbon estimates for your fields", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to the AgroSmart backend
    Login {
        /// Username (defaults to config, then prompts)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Get a fertilizer recommendation and record it in history
    Recommend {
        #[command(flatten)]
        reading: commands::recommend::ReadingArgs,

        /// Output the recorded recommendation as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Estimate the carbon footprint of fertilizer use
    Carbon {
        /// Farm area in hectares (default: 1)
        #[arg(long)]
        area: Option<f64>,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show recent recommendations, newest first
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Clear all recommendation history
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Export the full history to CSV
    Export {
        /// Directory to write into (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "agrosmart=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load()?;

    let exit_code = match cli.command {
        Commands::Login { username } => commands::login::execute(&config, username)?,
        Commands::Recommend { reading, json } => {
            commands::recommend::execute(&config, reading, json)?
        }
        Commands::Carbon { area, json } => commands::carbon::execute(area, json)?,
        Commands::History { limit, json } => commands::history::execute(&config, limit, json)?,
        Commands::Clear { yes } => commands::clear::execute(&config, yes)?,
        Commands::Export { output } => commands::export::execute(&config, output)?,
        Commands::Config { json } => commands::config::execute(&config, json)?,
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
