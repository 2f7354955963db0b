//! Symptom Tracker CLI
//!
//! Runs an interactive tracking session on stdin/stdout, or prints the
//! default configuration file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use symptom_tracker::config::{generate_default_config, Config, LoggingConfig};
use symptom_tracker::{Session, Tracker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "symptom-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track daily symptoms, chart trends, browse a month calendar")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive session (default)
    Session,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("symptom_tracker={}", logging.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => {
            tracing::info!("Symptom Tracker v{}", env!("CARGO_PKG_VERSION"));

            let tracker = Tracker::new(config.tracker.options());
            let mut session = Session::new(tracker);

            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "Symptom Tracker - type 'help' for commands")?;
            session.run(io::stdin().lock(), &mut out)?;

            tracing::info!(
                records = session.tracker().records().len(),
                "session ended"
            );
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Wrote default config to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}
