//! handlescout — race a candidate list against a signup-validation endpoint
//! and stop at the first confirmed-available identifier.

mod notify;
mod sinks;
mod wordlist;

use anyhow::Context;
use clap::Parser;
use handlescout_core::AppConfig;
use handlescout_probe::{HttpValidator, ProbeOrchestrator, ProbeSettings};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Probe a candidate list against a signup-validation endpoint, stopping at
/// the first confirmed-available identifier.
#[derive(Debug, Parser)]
#[command(name = "handlescout", version, about)]
struct Cli {
    /// Path to a config file (defaults to the XDG config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Candidate list, one identifier per line (overrides config)
    #[arg(long)]
    candidates: Option<PathBuf>,

    /// Worker count (overrides config)
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    config.apply_env();
    if let Some(path) = cli.candidates {
        config.files.candidates = path;
    }
    if let Some(workers) = cli.workers {
        config.probe.workers = workers;
    }
    config.validate()?;

    let candidates = wordlist::load(&config.files.candidates).await?;
    if candidates.is_empty() {
        warn!("candidate list is empty, nothing to probe");
    }
    info!(
        "Loaded {} candidates (randomized). Starting at ~{} req/s.",
        candidates.len(),
        config.probe.start_rate
    );

    let transport =
        Arc::new(HttpValidator::new(config.endpoint.clone()).context("building HTTP client")?);
    let notifications = config.notifications.clone();
    let orchestrator = ProbeOrchestrator::new(transport, ProbeSettings::from(&config.probe))
        .with_notifier(move |candidate| notify::announce(candidate, &notifications));

    // Ctrl-C stops the pool cooperatively; partial results are still flushed.
    let signal = orchestrator.signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping workers");
            signal.stop();
        }
    });

    let report = orchestrator.run(candidates).await;

    sinks::write_report(&config.files, &report).await?;

    if let Some(winner) = &report.winner {
        println!("\nStopped early. Found available: {winner}");
    } else if report.interrupted {
        println!(
            "\nInterrupted after {:.2}s — checked {} candidates.",
            report.elapsed.as_secs_f64(),
            report.checked
        );
    } else {
        println!(
            "\nAll taken after {:.2}s — checked {} candidates.",
            report.elapsed.as_secs_f64(),
            report.checked
        );
    }
    println!(
        "Logs: {} | Taken: {} | Available: {}",
        config.files.response_log.display(),
        config.files.taken.display(),
        config.files.available.display()
    );

    Ok(())
}
