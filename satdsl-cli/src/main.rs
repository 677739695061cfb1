//! satdsl: declarative configuration for Satellite / Foreman servers.
//!
//! Usage:
//!   satdsl apply demos/hostgroup.yaml
//!   satdsl bootstrap-config --answers /etc/foreman-installer/scenarios.d/foreman-answers.yaml
//!
//! `apply` reads the server settings written by `bootstrap-config` (or by
//! hand) from the platform config directory unless `--config` is given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use satdsl_cli::{ForemanAnswers, Manifest, DEFAULT_ANSWERS_FILE};
use satdsl_client::{SatelliteClient, ServerConfig};
use satdsl_ensure::Ensurer;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "satdsl")]
#[command(about = "Declarative configuration for Satellite / Foreman servers")]
#[command(version)]
struct Args {
    /// Server config file (defaults to <config dir>/satdsl/server.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure every entity in a manifest, in file order
    Apply {
        /// Manifest file (YAML list of steps)
        manifest: PathBuf,
    },

    /// Write a server config from the Foreman installer answers file
    BootstrapConfig {
        /// Installer answers file
        #[arg(long, default_value = DEFAULT_ANSWERS_FILE)]
        answers: PathBuf,

        /// Where to write the config (defaults to --config, then the default path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config_path = match args.config {
        Some(path) => path,
        None => ServerConfig::default_path().context("no config directory on this platform")?,
    };

    match args.command {
        Command::Apply { manifest } => apply(&config_path, &manifest).await,
        Command::BootstrapConfig { answers, output } => {
            bootstrap_config(&answers, &output.unwrap_or(config_path))
        }
    }
}

async fn apply(config_path: &Path, manifest_path: &Path) -> Result<()> {
    let config = ServerConfig::load(config_path)
        .with_context(|| format!("loading server config from {}", config_path.display()))?;
    let manifest = Manifest::load(manifest_path)?;
    info!(
        "Applying {} steps from {} to {}",
        manifest.steps.len(),
        manifest_path.display(),
        config.url
    );

    let ensurer = Ensurer::new(SatelliteClient::new(config)?);
    let applied = satdsl_cli::apply(&ensurer, &manifest)
        .await
        .with_context(|| format!("applying {}", manifest_path.display()))?;

    for (label, entity) in &applied.labels {
        debug!("@{} = {}", label, ensurer.describe(entity));
    }
    info!("Configuration complete");
    Ok(())
}

fn bootstrap_config(answers_path: &Path, output: &Path) -> Result<()> {
    let answers = ForemanAnswers::load(answers_path)?;
    debug!("Details detected from the answers file:");
    debug!("  URL: {}", answers.foreman_url);
    debug!("  Admin user: {}", answers.admin_username);

    let config = answers.to_server_config();
    config
        .save(output)
        .with_context(|| format!("writing server config to {}", output.display()))?;
    info!("Wrote server config for {} to {}", config.url, output.display());
    Ok(())
}
