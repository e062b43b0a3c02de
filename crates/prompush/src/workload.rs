//! Push cycle driver.

use crate::config::Config;
use crate::error::Result;
use crate::generator::{expected_sample, SampleGenerator, UniformValues, ValueSource};
use chrono::{DateTime, Utc};
use prompush_core::{Label, TimeSeries};
use prompush_remote_write::RemoteWriteClient;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Counters for a driver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub cycles: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Owns the immutable configuration, the HTTP client and the value source.
///
/// Cycles run strictly one after another; the HTTP connection pool is
/// reused across them.
pub struct Pusher<V = UniformValues> {
    config: Config,
    extra_labels: Vec<Label>,
    client: RemoteWriteClient,
    generator: SampleGenerator<V>,
}

impl Pusher<UniformValues> {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_values(config, UniformValues::from_entropy())
    }
}

impl<V: ValueSource> Pusher<V> {
    /// Validates `config` and builds the client once.
    pub fn with_values(config: Config, values: V) -> Result<Self> {
        config.validate()?;
        let client = RemoteWriteClient::new(&config.remote_write())?;
        let generator = SampleGenerator::new(values, config.exemplar.to_label());
        let extra_labels = config.extra_labels();

        Ok(Self {
            config,
            extra_labels,
            client,
            generator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates a series for the current time and pushes it.
    pub async fn run_cycle_once(&mut self) -> Result<TimeSeries> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Generates a series for `now` and pushes it. All or nothing: the
    /// series is returned only when the endpoint accepted it.
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Result<TimeSeries> {
        let series = self
            .generator
            .generate(&self.config.series.metric_name, now, &self.extra_labels);

        self.client.push(vec![series.clone()]).await?;

        info!(series = %series, "pushed series");
        if let Some(expected) = expected_sample(&series) {
            debug!(?expected, "expected query result");
        }
        Ok(series)
    }

    /// Pushes once immediately, then once per interval, until `max_cycles`
    /// is reached or the failure policy gives up.
    pub async fn run(&mut self) -> Result<CycleStats> {
        let mut stats = CycleStats::default();
        let mut consecutive_failures = 0u32;

        // The first tick completes immediately.
        let mut interval = tokio::time::interval(self.config.push.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let result = self.run_cycle_once().await;
            stats.cycles += 1;
            let done = self
                .config
                .push
                .max_cycles
                .is_some_and(|max| stats.cycles >= max);

            match result {
                Ok(_) => {
                    stats.succeeded += 1;
                    consecutive_failures = 0;
                }
                Err(e) => {
                    stats.failed += 1;
                    consecutive_failures = consecutive_failures.saturating_add(1);

                    let Some(delay) = self.config.failure.backoff(consecutive_failures) else {
                        error!(error = %e, cycle = stats.cycles, "Push failed, stopping");
                        return Err(e);
                    };
                    warn!(
                        error = %e,
                        cycle = stats.cycles,
                        consecutive_failures,
                        backoff = ?delay,
                        "Push failed, skipping cycle"
                    );
                    if !done {
                        tokio::time::sleep(delay).await;
                    }
                }
            }

            if done {
                break;
            }
        }

        info!(
            cycles = stats.cycles,
            succeeded = stats.succeeded,
            failed = stats.failed,
            "Push loop completed"
        );
        Ok(stats)
    }
}

/// Runs a single push cycle with a fresh client and entropy-seeded values.
pub async fn run_cycle_once(config: &Config) -> Result<()> {
    let mut pusher = Pusher::new(config.clone())?;
    pusher.run_cycle_once().await?;
    Ok(())
}
