//! Synthetic remote-write pusher for exercising a metrics backend's write path.
//!
//! Every cycle generates one series for a fixed metric name with a single
//! sample and an exemplar mirroring it, then pushes it to a Prometheus
//! remote-write endpoint with basic auth. It checks ingestion, exemplar
//! handling and millisecond timestamp precision; it does not scrape anything.
//!
//! # Series
//! - `prompush_series{job="prompush", user="<username>"}` with a value in `[0, 1)`
//! - one exemplar `{trace_id="1234"}` with the same value and timestamp
//!
//! # Usage
//! ```bash
//! # Push every 5 seconds to a local receiver
//! prompush --push.host localhost:8082 --push.username alice --push.password secret
//!
//! # Push three times, stop at the first failure
//! prompush --push.count 3 --push.fail-fast
//!
//! # Load settings from YAML, flags still win
//! prompush --config prompush.yml --push.interval-ms 1000
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod workload;

pub use config::{Config, ExemplarSettings, FailurePolicy, PushSettings, SeriesSettings};
pub use error::CycleError;
pub use generator::{ConstantValue, SampleGenerator, UniformValues, ValueSource};
pub use workload::{run_cycle_once, CycleStats, Pusher};
