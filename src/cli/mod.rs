use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::AppConfig;

pub mod commands;
pub mod models;
pub mod run;
pub mod settings;

#[derive(Subcommand)]
enum Command {
    /// Start an interactive debate between the two personas
    Run {
        /// Start debating this topic right away
        #[arg(long)]
        topic: Option<String>,

        /// Number of rounds, where each persona speaks once per round
        #[arg(long)]
        rounds: Option<usize>,
    },
    /// Show the current debate settings
    Settings {},
    /// List known models
    Models {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    // Logs go to stderr so they don't interleave with the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    // Handle each sub command
    match args.command {
        Some(Command::Run { topic, rounds }) => {
            let config = AppConfig::from_env()?;
            run::run(config, topic, rounds).await?;
        }
        Some(Command::Settings {}) => {
            let config = AppConfig::from_env()?;
            settings::run(&config)?;
        }
        Some(Command::Models {}) => {
            models::run()?;
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
