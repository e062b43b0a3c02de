//! Configuration structs for prompush.
//!
//! Everything can be loaded from YAML; missing keys fall back to the defaults
//! below. Command-line flags override file values in `main.rs`.

use crate::error::{CycleError, Result};
use prompush_core::{validate_extra_labels, validate_metric_name, Label};
use prompush_remote_write::RemoteWriteConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for the pusher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint, credentials and timing
    pub push: PushSettings,

    /// Series identity
    pub series: SeriesSettings,

    /// Label attached to every exemplar
    pub exemplar: ExemplarSettings,

    /// What the driver does when a cycle fails
    pub failure: FailurePolicy,
}

/// Remote write target and cycle timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushSettings {
    /// Remote write host (authority only, e.g. "localhost:8082")
    pub host: String,

    /// Basic auth user on write requests
    pub username: String,

    /// Basic auth password on write requests
    pub password: String,

    /// Per-request deadline in milliseconds
    pub timeout_ms: u64,

    /// Time between pushes in milliseconds
    pub interval_ms: u64,

    /// Stop after this many cycles (startup push included). Runs forever when unset.
    pub max_cycles: Option<u64>,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            host: "localhost:8082".to_string(),
            username: String::new(),
            password: String::new(),
            timeout_ms: 5_000,
            interval_ms: 5_000,
            max_cycles: None,
        }
    }
}

impl PushSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    pub metric_name: String,
    pub job: String,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            metric_name: "prompush_series".to_string(),
            job: "prompush".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExemplarSettings {
    /// Exemplar label name
    pub label: String,
    /// Exemplar label value
    pub value: String,
}

impl Default for ExemplarSettings {
    fn default() -> Self {
        Self {
            label: "trace_id".to_string(),
            value: "1234".to_string(),
        }
    }
}

impl ExemplarSettings {
    pub fn to_label(&self) -> Label {
        Label::new(&self.label, &self.value)
    }
}

/// How the driver reacts to a failed cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failed cycle and return its error.
    FailFast,

    /// Log the failure, wait an exponentially growing delay, then carry on
    /// with the next tick. The delay resets after a successful cycle.
    Continue {
        #[serde(default = "default_base_delay_ms")]
        base_delay_ms: u64,
        #[serde(default = "default_max_delay_ms")]
        max_delay_ms: u64,
    },
}

fn default_base_delay_ms() -> u64 {
    1_000
}

fn default_max_delay_ms() -> u64 {
    60_000
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Continue {
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl FailurePolicy {
    /// Delay to wait after the `consecutive_failures`-th failure in a row,
    /// or `None` when the driver should stop.
    pub fn backoff(&self, consecutive_failures: u32) -> Option<Duration> {
        match self {
            FailurePolicy::FailFast => None,
            FailurePolicy::Continue {
                base_delay_ms,
                max_delay_ms,
            } => {
                let factor = 1u64
                    .checked_shl(consecutive_failures.saturating_sub(1))
                    .unwrap_or(u64::MAX);
                let delay = base_delay_ms.saturating_mul(factor).min(*max_delay_ms);
                Some(Duration::from_millis(delay))
            }
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Labels appended after `__name__` on every generated series.
    pub fn extra_labels(&self) -> Vec<Label> {
        vec![
            Label::new("job", &self.series.job),
            Label::new("user", &self.push.username),
        ]
    }

    pub fn remote_write(&self) -> RemoteWriteConfig {
        RemoteWriteConfig::new(&self.push.host)
            .with_credentials(&self.push.username, &self.push.password)
            .with_timeout(self.push.timeout())
    }

    /// Checks everything the driver relies on before the first cycle.
    pub fn validate(&self) -> Result<()> {
        if self.push.host.is_empty() {
            return Err(CycleError::InvalidConfig("push host is empty".to_string()));
        }
        if self.push.interval_ms == 0 {
            return Err(CycleError::InvalidConfig(
                "push interval must be greater than zero".to_string(),
            ));
        }
        if self.push.max_cycles == Some(0) {
            return Err(CycleError::InvalidConfig(
                "max cycles must be greater than zero".to_string(),
            ));
        }
        if self.exemplar.label.is_empty() {
            return Err(CycleError::InvalidConfig(
                "exemplar label name is empty".to_string(),
            ));
        }
        validate_metric_name(&self.series.metric_name)?;
        validate_extra_labels(&self.extra_labels())?;
        Ok(())
    }
}
