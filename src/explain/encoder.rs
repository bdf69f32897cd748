//! Analyzed-explain wire message
//!
//! Layout (big-endian):
//! - Tag (i16): always 1, "analyzed explain"
//! - Length (i32): payload length + 1 for the marker byte
//! - Marker (u8): ASCII space
//! - Payload: UTF-8 JSON of the report envelope
//!
//! No checksum, no compression.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ExplainError, ExplainResult};

/// Message kind tag for an analyzed explain report
pub const ANALYZED_EXPLAIN_TAG: i16 = 1;

/// Format marker preceding the JSON payload
pub const FORMAT_MARKER: u8 = b' ';

/// Tag + length + marker
pub const HEADER_LEN: usize = 2 + 4 + 1;

/// Placeholder sent while source correlation is not part of the report
pub const EDGEQL_UNIMPLEMENTED: &str = "UNIMPLEMENTED";

/// Report envelope sent to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Source-level annotation
    pub edgeql: String,
    /// Rewritten storage plan
    pub sql: Value,
}

impl ReportEnvelope {
    /// Envelope around a rewritten plan
    pub fn new(sql: Value) -> Self {
        Self {
            edgeql: EDGEQL_UNIMPLEMENTED.to_string(),
            sql,
        }
    }
}

/// Serializes `payload` as JSON and frames it
pub fn make_message<T: Serialize>(payload: &T) -> ExplainResult<Vec<u8>> {
    let body = serde_json::to_vec(payload)
        .map_err(|e| ExplainError::encode_failed(format!("Failed to serialize report: {}", e)))?;
    frame(&body)
}

/// Frames an already-serialized payload
pub fn frame(body: &[u8]) -> ExplainResult<Vec<u8>> {
    let length = body
        .len()
        .checked_add(1)
        .and_then(|len| i32::try_from(len).ok())
        .ok_or_else(|| {
            ExplainError::encode_failed(format!(
                "Payload of {} bytes does not fit the length field",
                body.len()
            ))
        })?;

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(&ANALYZED_EXPLAIN_TAG.to_be_bytes());
    buf.extend_from_slice(&length.to_be_bytes());
    buf.push(FORMAT_MARKER);
    buf.extend_from_slice(body);
    Ok(buf)
}

/// A decoded wire message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedMessage {
    pub tag: i16,
    pub marker: u8,
    pub payload: Vec<u8>,
}

impl DecodedMessage {
    /// Parses the payload as a report envelope
    pub fn report(&self) -> ExplainResult<ReportEnvelope> {
        serde_json::from_slice(&self.payload).map_err(|e| {
            ExplainError::malformed_message(format!("Payload is not a report envelope: {}", e))
        })
    }
}

/// Decodes a framed message, requiring the frame to span `bytes` exactly
pub fn decode_message(bytes: &[u8]) -> ExplainResult<DecodedMessage> {
    if bytes.len() < HEADER_LEN {
        return Err(ExplainError::malformed_message(format!(
            "Message of {} bytes is shorter than the {}-byte header",
            bytes.len(),
            HEADER_LEN
        )));
    }

    let tag = i16::from_be_bytes([bytes[0], bytes[1]]);
    if tag != ANALYZED_EXPLAIN_TAG {
        return Err(ExplainError::malformed_message(format!(
            "Unexpected message tag {}",
            tag
        )));
    }

    let length = i32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
    let expected = usize::try_from(length)
        .ok()
        .filter(|len| *len >= 1)
        .ok_or_else(|| ExplainError::malformed_message(format!("Invalid length {}", length)))?;

    let actual = bytes.len() - (HEADER_LEN - 1);
    if actual != expected {
        return Err(ExplainError::malformed_message(format!(
            "Length field says {} bytes, message carries {}",
            expected, actual
        )));
    }

    Ok(DecodedMessage {
        tag,
        marker: bytes[6],
        payload: bytes[HEADER_LEN..].to_vec(),
    })
}
