//! dappnet-test binary: reconcile a node's environment and verify a freshly
//! deployed package against it.

use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use dappnetsdk::{Config, RunRequest, TestEnvRunner};

#[derive(Parser, Debug)]
#[command(
    name = "dappnet-test",
    version,
    about = "Reconcile a dappnet node's environment and verify a deployed package"
)]
struct Args {
    /// Package under test
    #[arg(long)]
    package: String,

    /// Service whose container is checked; repeatable. Defaults to the
    /// package's own name.
    #[arg(long = "container")]
    containers: Vec<String>,

    /// Comma-separated runner labels (falls back to the RUNNER_LABELS
    /// environment variable)
    #[arg(long)]
    labels: Option<String>,

    /// TOML config path; built-in defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Health endpoint probed once with GET
    #[arg(long = "health-url")]
    health_url: Option<String>,

    /// Validator index for attestation-enabled networks
    #[arg(long = "validator-index")]
    validator_index: Option<u64>,

    /// Seconds to wait before scanning container logs (clamped to 120)
    #[arg(long = "log-wait-secs")]
    log_wait_secs: Option<u64>,
}

fn parse_labels(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|s| {
        s.split(',')
            .map(|label| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to info level if RUST_LOG not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let args = Args::parse();

    // The only place the process environment is consulted; everything below
    // receives the labels as an explicit value.
    let labels = parse_labels(args.labels.or_else(|| std::env::var("RUNNER_LABELS").ok()));

    let config = Config::load(args.config.as_deref()).map_err(anyhow::Error::msg)?;
    let runner = TestEnvRunner::connect(config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, cancelling in-flight checks");
            ctrl_c.cancel();
        }
    });

    let request = RunRequest {
        package: args.package,
        services: args.containers,
        labels,
        health_url: args.health_url,
        validator_index: args.validator_index,
        log_wait_secs: args.log_wait_secs,
    };

    let report = runner.run(&request, &cancel).await?;
    tracing::info!(
        "Run complete: network {}, removed {}, installed {}, {} of {} check(s) passed",
        report.network,
        report.reconcile.removed.len(),
        report.reconcile.installed.len(),
        report.verify.passed_count(),
        report.verify.outcomes.len()
    );
    Ok(())
}
