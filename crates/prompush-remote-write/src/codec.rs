//! Body codec: protobuf serialization followed by Snappy block compression.
//!
//! Remote-write 1.0 uses the raw (unframed) Snappy format: a varint of the
//! uncompressed length followed by the compressed block.

use crate::error::{Result, TransmitError};
use prompush_core::{TimeSeries, WriteRequest};
use prost::Message;

/// `Content-Encoding` token for the compressed body.
pub const CONTENT_ENCODING: &str = "snappy";

/// `Content-Type` of the uncompressed body.
pub const CONTENT_TYPE: &str = "application/x-protobuf";

/// Value of the `X-Prometheus-Remote-Write-Version` header.
pub const REMOTE_WRITE_VERSION: &str = "0.1.0";

/// Header carrying the protocol version.
pub const REMOTE_WRITE_VERSION_HEADER: &str = "X-Prometheus-Remote-Write-Version";

/// Serializes a write request. Output is deterministic for equal inputs.
pub fn encode(request: &WriteRequest) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(request.encoded_len());
    request.encode(&mut buf)?;
    Ok(buf)
}

/// Snappy block-compresses an encoded request.
pub fn compress(raw: &[u8]) -> Result<Vec<u8>> {
    snap::raw::Encoder::new()
        .compress_vec(raw)
        .map_err(|e| TransmitError::EncodeFailed(e.to_string()))
}

/// Builds the exact HTTP body for a list of series.
pub fn encode_compressed(timeseries: Vec<TimeSeries>) -> Result<Vec<u8>> {
    let request = WriteRequest::new(timeseries);
    let raw = encode(&request)?;
    compress(&raw)
}

/// Reverses [`encode_compressed`]. Used by receivers and in tests.
pub fn decode_compressed(body: &[u8]) -> Result<WriteRequest> {
    let raw = snap::raw::Decoder::new()
        .decompress_vec(body)
        .map_err(|e| TransmitError::DecodeFailed(e.to_string()))?;
    Ok(WriteRequest::decode(raw.as_slice())?)
}
