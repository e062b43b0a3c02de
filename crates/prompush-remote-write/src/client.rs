//! Authenticated remote-write HTTP client.

use crate::codec::{
    encode_compressed, CONTENT_ENCODING, CONTENT_TYPE, REMOTE_WRITE_VERSION,
    REMOTE_WRITE_VERSION_HEADER,
};
use crate::error::{Result, TransmitError};
use prompush_core::TimeSeries;
use reqwest::header;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Path appended to the endpoint authority.
pub const PUSH_PATH: &str = "/api/v1/push";

/// Default per-request deadline covering connect, send and receive.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest response body kept in an [`TransmitError::UnexpectedStatus`].
const MAX_ERROR_BODY: usize = 512;

/// Where and how to push.
#[derive(Clone)]
pub struct RemoteWriteConfig {
    /// Endpoint authority, e.g. "localhost:8082"
    pub endpoint: String,

    /// Basic auth user. Empty is sent as-is, never omitted.
    pub username: String,

    /// Basic auth password
    pub password: String,

    /// Request deadline
    pub timeout: Duration,
}

impl RemoteWriteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: String::new(),
            password: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full push URL for the configured authority.
    pub fn push_url(&self) -> String {
        format!("http://{}{}", self.endpoint.trim_end_matches('/'), PUSH_PATH)
    }
}

impl fmt::Debug for RemoteWriteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteWriteConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Pushes series to a remote-write endpoint.
///
/// Holds a single `reqwest::Client`, so connections are pooled across pushes.
/// Cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct RemoteWriteClient {
    client: reqwest::Client,
    push_url: String,
    username: String,
    password: String,
}

impl RemoteWriteClient {
    pub fn new(config: &RemoteWriteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("prompush/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TransmitError::Client)?;

        Ok(Self {
            client,
            push_url: config.push_url(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn push_url(&self) -> &str {
        &self.push_url
    }

    /// Encodes, compresses and POSTs one write request.
    ///
    /// Returns once the endpoint answers with a 2xx status. Timeouts,
    /// connection failures and non-2xx answers are returned as errors.
    pub async fn push(&self, timeseries: Vec<TimeSeries>) -> Result<()> {
        let body = encode_compressed(timeseries)?;
        let body_len = body.len();

        let response = self
            .client
            .post(&self.push_url)
            .header(header::CONTENT_ENCODING, CONTENT_ENCODING)
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .header(REMOTE_WRITE_VERSION_HEADER, REMOTE_WRITE_VERSION)
            .basic_auth(&self.username, Some(&self.password))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(url = %self.push_url, bytes = body_len, status = status.as_u16(), "remote write response");

        // The body is read in both branches so the connection goes back to the pool.
        if status.is_success() {
            let _ = response.bytes().await;
            return Ok(());
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut end = MAX_ERROR_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Err(TransmitError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}
