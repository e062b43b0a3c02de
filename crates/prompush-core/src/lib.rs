//! prompush core - data model for the remote-write push path
//!
//! This crate provides the types shared by the generator and the transmitter:
//! - `Label`, `Sample`, `Exemplar`, `TimeSeries`, `WriteRequest`: protobuf
//!   messages matching the Prometheus remote-write 1.0 schema
//! - `validate_extra_labels` / `validate_metric_name`: boundary checks for
//!   label sets supplied by configuration
//! - `to_epoch_millis`: wall-clock to millisecond timestamp conversion

pub mod error;
pub mod timestamp;
pub mod types;

pub use error::{CoreError, Result};
pub use timestamp::to_epoch_millis;
pub use types::*;
