//! Errors surfaced by a push cycle.

use prompush_core::CoreError;
use prompush_remote_write::TransmitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CycleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid series labels: {0}")]
    Labels(#[from] CoreError),

    #[error(transparent)]
    Transmit(#[from] TransmitError),
}

pub type Result<T> = std::result::Result<T, CycleError>;
