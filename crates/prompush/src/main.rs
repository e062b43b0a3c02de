//! CLI entry point for prompush.

use anyhow::Result;
use clap::Parser;
use prompush::{Config, FailurePolicy, Pusher};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "prompush")]
#[command(about = "Pushes a synthetic series with an exemplar to a Prometheus remote-write endpoint")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Remote write host [default: localhost:8082]
    #[arg(long = "push.host")]
    host: Option<String>,

    /// Set the basic auth user on write requests
    #[arg(long = "push.username")]
    username: Option<String>,

    /// Set the basic auth password on write requests
    #[arg(long = "push.password")]
    password: Option<String>,

    /// Exemplar label name [default: trace_id]
    #[arg(long = "push.exemplar.label")]
    exemplar_label: Option<String>,

    /// Exemplar label value [default: 1234]
    #[arg(long = "push.exemplar.value")]
    exemplar_value: Option<String>,

    /// Milliseconds between pushes [default: 5000]
    #[arg(long = "push.interval-ms")]
    interval_ms: Option<u64>,

    /// Per-request deadline in milliseconds [default: 5000]
    #[arg(long = "push.timeout-ms")]
    timeout_ms: Option<u64>,

    /// Stop after this many pushes
    #[arg(long = "push.count")]
    count: Option<u64>,

    /// Exit on the first failed push instead of backing off
    #[arg(long = "push.fail-fast")]
    fail_fast: bool,
}

impl Cli {
    /// Flags given on the command line win over file values.
    fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.push.host = host;
        }
        if let Some(username) = self.username {
            config.push.username = username;
        }
        if let Some(password) = self.password {
            config.push.password = password;
        }
        if let Some(label) = self.exemplar_label {
            config.exemplar.label = label;
        }
        if let Some(value) = self.exemplar_value {
            config.exemplar.value = value;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.push.interval_ms = interval_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.push.timeout_ms = timeout_ms;
        }
        if self.count.is_some() {
            config.push.max_cycles = self.count;
        }
        if self.fail_fast {
            config.failure = FailurePolicy::FailFast;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);

    info!(
        host = %config.push.host,
        metric = %config.series.metric_name,
        interval_ms = config.push.interval_ms,
        policy = ?config.failure,
        "Starting prompush"
    );

    let mut pusher = Pusher::new(config)?;

    tokio::select! {
        result = pusher.run() => {
            let stats = result?;
            info!(cycles = stats.cycles, failed = stats.failed, "Done");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, stopping");
        }
    }

    Ok(())
}
