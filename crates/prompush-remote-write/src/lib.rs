//! Prometheus remote-write transmitter.
//!
//! Turns an already-built list of series into a Snappy-compressed protobuf
//! `WriteRequest` and POSTs it to `http://{endpoint}/api/v1/push` with basic
//! authentication and a bounded deadline. One call is one HTTP request; retry
//! policy belongs to the caller.
//!
//! # Usage
//! ```no_run
//! # async fn run(series: Vec<prompush_core::TimeSeries>) -> Result<(), prompush_remote_write::TransmitError> {
//! use prompush_remote_write::{RemoteWriteClient, RemoteWriteConfig};
//!
//! let config = RemoteWriteConfig::new("localhost:8082").with_credentials("alice", "secret");
//! let client = RemoteWriteClient::new(&config)?;
//! client.push(series).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod codec;
pub mod error;

pub use client::{RemoteWriteClient, RemoteWriteConfig, DEFAULT_TIMEOUT, PUSH_PATH};
pub use codec::{decode_compressed, encode, encode_compressed};
pub use error::{Result, TransmitError};
