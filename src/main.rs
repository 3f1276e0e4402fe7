use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{CheckCommand, ConfigCommand, HabitCommand, MonthCommand, WeekCommand};
use config::Config;
use habits::{FileKeyValueStore, HabitStore, Tracker};

#[derive(Parser)]
#[command(name = "habits")]
#[command(version)]
#[command(about = "A daily habit tracker", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage habits
    Habit(HabitCommand),

    /// Toggle a habit's check for a day
    Check(CheckCommand),

    /// Show or reset a week of checks
    Week(WeekCommand),

    /// Show a month calendar of completion
    Month(MonthCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habits=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = Config::load(cli.config)?;
    tracing::debug!(
        "Using data dir {} (key '{}')",
        config.data_dir.value.display(),
        config.storage_key.value
    );

    match &cli.command {
        Some(Commands::Habit(cmd)) => {
            let mut tracker = open_tracker(&config);
            cmd.run(&mut tracker)?;
        }
        Some(Commands::Check(cmd)) => {
            let mut tracker = open_tracker(&config);
            cmd.run(&mut tracker)?;
        }
        Some(Commands::Week(cmd)) => {
            let mut tracker = open_tracker(&config);
            cmd.run(&mut tracker)?;
        }
        Some(Commands::Month(cmd)) => {
            let tracker = open_tracker(&config);
            cmd.run(&tracker)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn open_tracker(config: &Config) -> Tracker<FileKeyValueStore> {
    let backend = FileKeyValueStore::new(config.data_dir.value.clone());
    Tracker::open(HabitStore::with_key(backend, config.storage_key.value.clone()))
}
