//! Shared frame model and codecs for the host message channel.
//!
//! Every message exchanged with the notebook host, in either direction, is a
//! [`Frame`]: a named event plus a JSON payload. The crate owns both wire
//! representations the host accepts: JSON text and a compact protobuf binary
//! encoding. Payload shape is left to the `form` and `mapview` crates, which
//! parse frames into their own typed messages.

use std::time::{SystemTime, UNIX_EPOCH};

use prost::Message;
use prost_types::value::Kind;
use prost_types::{ListValue, NullValue, Struct};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Largest integer a double holds exactly (2^53).
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed protobuf frame: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("malformed json frame: {0}")]
    Json(#[from] serde_json::Error),
}

/// Grepable error code for log lines and advisory payloads.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// A single message on the host channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// UUID v4 string.
    pub id: String,
    /// Creation time, epoch milliseconds.
    pub ts: i64,
    /// Cell this frame belongs to, if the host multiplexes several cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_id: Option<String>,
    /// Event name, e.g. `"update_field"`.
    pub event: String,
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}

impl Frame {
    /// Create a frame for `event` carrying `data`, stamped with a fresh id.
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ts: epoch_millis(),
            cell_id: None,
            event: event.into(),
            data,
        }
    }

    #[must_use]
    pub fn with_cell_id(mut self, cell_id: impl Into<String>) -> Self {
        self.cell_id = Some(cell_id.into());
        self
    }
}

// =============================================================================
// JSON
// =============================================================================

/// # Errors
///
/// Returns [`CodecError::Json`] if the payload cannot be serialized.
pub fn to_json(frame: &Frame) -> Result<String, CodecError> {
    Ok(serde_json::to_string(frame)?)
}

/// # Errors
///
/// Returns [`CodecError::Json`] for malformed text.
pub fn from_json(text: &str) -> Result<Frame, CodecError> {
    Ok(serde_json::from_str(text)?)
}

// =============================================================================
// PROTOBUF
// =============================================================================

#[derive(Clone, PartialEq, Message)]
struct ProtoFrame {
    #[prost(string, tag = "1")]
    id: String,
    #[prost(int64, tag = "2")]
    ts: i64,
    #[prost(string, optional, tag = "3")]
    cell_id: Option<String>,
    #[prost(string, tag = "4")]
    event: String,
    #[prost(message, optional, tag = "5")]
    data: Option<prost_types::Value>,
}

impl From<&Frame> for ProtoFrame {
    fn from(frame: &Frame) -> Self {
        Self {
            id: frame.id.clone(),
            ts: frame.ts,
            cell_id: frame.cell_id.clone(),
            event: frame.event.clone(),
            data: Some(to_proto(&frame.data)),
        }
    }
}

impl From<ProtoFrame> for Frame {
    fn from(proto: ProtoFrame) -> Self {
        Self {
            id: proto.id,
            ts: proto.ts,
            cell_id: proto.cell_id,
            event: proto.event,
            data: proto.data.as_ref().map_or_else(empty_object, from_proto),
        }
    }
}

#[must_use]
pub fn encode_frame(frame: &Frame) -> Vec<u8> {
    ProtoFrame::from(frame).encode_to_vec()
}

/// Missing data decodes to `{}`.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed bytes.
pub fn decode_frame(bytes: &[u8]) -> Result<Frame, CodecError> {
    Ok(ProtoFrame::decode(bytes)?.into())
}

fn null_kind() -> Kind {
    Kind::NullValue(NullValue::NullValue.into())
}

fn to_proto(value: &Value) -> prost_types::Value {
    let kind = match value {
        Value::Null => null_kind(),
        Value::Bool(flag) => Kind::BoolValue(*flag),
        Value::Number(number) => number.as_f64().map_or_else(null_kind, Kind::NumberValue),
        Value::String(text) => Kind::StringValue(text.clone()),
        Value::Array(items) => Kind::ListValue(ListValue { values: items.iter().map(to_proto).collect() }),
        Value::Object(map) => Kind::StructValue(Struct {
            fields: map.iter().map(|(key, item)| (key.clone(), to_proto(item))).collect(),
        }),
    };
    prost_types::Value { kind: Some(kind) }
}

fn from_proto(value: &prost_types::Value) -> Value {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => Value::Null,
        Some(Kind::BoolValue(flag)) => Value::Bool(*flag),
        Some(Kind::NumberValue(number)) => json_number(*number),
        Some(Kind::StringValue(text)) => Value::String(text.clone()),
        Some(Kind::ListValue(list)) => list.values.iter().map(from_proto).collect(),
        Some(Kind::StructValue(map)) => Value::Object(
            map.fields.iter().map(|(key, item)| (key.clone(), from_proto(item))).collect(),
        ),
    }
}

/// Protobuf numbers are doubles. Whole values come back as JSON integers so
/// `idx` and `zoom` survive unchanged; NaN and infinities become `null`.
#[allow(clippy::cast_possible_truncation)]
fn json_number(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < MAX_EXACT_INT {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
