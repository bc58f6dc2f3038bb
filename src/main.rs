//! FinSeg - Customer Financial Segmentation
//!
//! Loads the pretrained artifacts once, then serves predictions through the
//! terminal form, a NATS request/reply service, or a one-shot JSON call.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finseg::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    form::FormShell,
    logging,
    models::{inference::InferenceEngine, loader::ArtifactCache},
    service,
    types::profile::ProfileInput,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Customer financial segmentation
#[derive(Parser, Debug)]
#[command(name = "finseg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, env = "FINSEG_CONFIG", default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive terminal form (default)
    Form,
    /// Answer segmentation requests over NATS
    Serve,
    /// Segment one JSON-encoded profile and print the report
    Predict {
        /// Profile as JSON, e.g. '{"income": 50000, "age": 35}'
        #[arg(short, long)]
        profile: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    logging::init(&config.logging)?;

    info!("Starting FinSeg");

    // Artifacts load once here; a missing or corrupt artifact stops startup
    let cache = ArtifactCache::new(config.artifacts.clone());
    let engine = Arc::new(
        InferenceEngine::from_cache(&cache).context("Failed to load pretrained artifacts")?,
    );

    match cli.command.unwrap_or(Commands::Form) {
        Commands::Form => {
            let engine = engine.clone();
            let shown = tokio::task::spawn_blocking(move || {
                let stdin = std::io::stdin();
                let stdout = std::io::stdout();
                FormShell::new(stdin.lock(), stdout.lock()).run(&engine)
            })
            .await??;
            info!(reports = shown, "Form session finished");
        }
        Commands::Serve => service::serve(config, engine).await?,
        Commands::Predict { profile } => {
            let input: ProfileInput =
                serde_json::from_str(&profile).context("Invalid profile JSON")?;
            let report = engine.segment(&input.clamped())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
