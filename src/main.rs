//! Stagecast - staged rollout step notifier.
//!
//! Reads one track's release state, decides the next rollout step from the
//! configured schedule, and posts the decision to a chat webhook.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stagecast::{app, CardNotifier, Credentials, PlayClient};

/// Announce when a staged Play-store rollout is ready to advance
#[derive(Parser)]
#[command(name = "stagecast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Track to query (e.g. production, internal)
    track: String,

    /// Comma-separated rollout percentages (e.g. 1,20,50,100)
    rollout_steps: String,

    /// Application package name (e.g. com.example.app)
    package_name: String,

    /// Webhook URL to post the notification card to
    webhook_url: String,

    /// Path to the credentials JSON file
    credentials_file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    execute(&cli)
}

fn execute(cli: &Cli) -> Result<()> {
    let credentials = Credentials::from_file(&cli.credentials_file)?;
    let reader = PlayClient::new(credentials);
    let notifier = CardNotifier::new(&cli.webhook_url);

    let outcome =
        app::run(&reader, &notifier, &cli.package_name, &cli.track, &cli.rollout_steps)?;

    // Every outcome is a graceful exit; failed delivery is already logged.
    tracing::debug!(?outcome, "run finished");
    Ok(())
}
