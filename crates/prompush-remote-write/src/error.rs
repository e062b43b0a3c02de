//! Error types for the remote-write transmitter

use thiserror::Error;

/// Failures of a single push. Nothing is retried at this level.
#[derive(Error, Debug)]
pub enum TransmitError {
    #[error("Failed to encode write request: {0}")]
    EncodeFailed(String),

    #[error("Failed to decode write request: {0}")]
    DecodeFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    TransportFailure(#[source] reqwest::Error),

    #[error("Unexpected response status code: {status} - {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl TransmitError {
    /// True when the endpoint was never reached or never answered in time.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TransmitError::Timeout(_) | TransmitError::TransportFailure(_)
        )
    }

    /// Status code of a rejected push.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransmitError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransmitError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransmitError::Timeout(e)
        } else {
            TransmitError::TransportFailure(e)
        }
    }
}

impl From<prost::EncodeError> for TransmitError {
    fn from(e: prost::EncodeError) -> Self {
        TransmitError::EncodeFailed(e.to_string())
    }
}

impl From<prost::DecodeError> for TransmitError {
    fn from(e: prost::DecodeError) -> Self {
        TransmitError::DecodeFailed(e.to_string())
    }
}

/// Result type for transmitter operations
pub type Result<T> = std::result::Result<T, TransmitError>;
