use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fairplay::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(
    name = "fairplay",
    version,
    about = "Keeps collaborative playlists fair by interleaving contributors round-robin",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage playlists and serve the control API until Ctrl-C
    Run {
        /// TOML config file (environment variables are used otherwise)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Playlist to manage at startup (repeatable)
        #[arg(short, long = "playlist")]
        playlists: Vec<String>,
    },

    /// Print the fair target ordering and relocations for a snapshot file
    Plan {
        /// Snapshot JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Index of the currently playing track
        #[arg(short, long)]
        playing_index: usize,
    },

    /// Run one pass over a snapshot file against an in-memory provider
    Simulate {
        /// Snapshot JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Track id reported as currently playing
        #[arg(short, long)]
        playing: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.command {
        Commands::Run { config, .. } => commands::load_config(config.as_deref())?,
        _ => Config::default(),
    };

    // Initialize tracing/logging
    let format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Run { playlists, .. } => {
            tracing::info!(playlists = playlists.len(), "fairplay starting");
            commands::run(config, playlists).await?;
        }

        Commands::Plan {
            input,
            playing_index,
        } => {
            commands::plan(&input, playing_index)?;
        }

        Commands::Simulate { input, playing } => {
            commands::simulate(&input, &playing).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("fairplay=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("fairplay={level},warn"))
        })
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
