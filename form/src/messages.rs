//! Tagged messages exchanged with the host.
//!
//! Each direction has one enum with a closed set of variants. Frames whose
//! event name is not in the set are rejected with
//! [`MessageError::UnknownEvent`] instead of being read with a guessed shape.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use frames::Frame;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::Data;
use crate::layer::{Layer, LayerId};
use crate::source::SourceVariable;
use crate::store::LayerRef;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("unknown inbound event: {0}")]
    UnknownEvent(String),
    #[error("invalid payload for {event}: {source}")]
    InvalidPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("update_layer names neither layer_id nor idx")]
    MissingLayerRef,
}

impl frames::ErrorCode for MessageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEvent(_) => "E_UNKNOWN_EVENT",
            Self::InvalidPayload { .. } => "E_INVALID_PAYLOAD",
            Self::MissingLayerRef => "E_MISSING_LAYER_REF",
        }
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// UI → host messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// A committed field edit. `idx`/`layer_id` are absent for root fields.
    UpdateField {
        field: String,
        value: Value,
        idx: Option<usize>,
        layer_id: Option<LayerId>,
    },
    /// Append a default layer.
    AddLayer,
    /// Remove the layer currently at `layer`.
    RemoveLayer { layer: usize, layer_id: LayerId },
    /// Move the layer at `removed_index` to `added_index`.
    MoveLayer { removed_index: usize, added_index: usize },
}

impl Outbound {
    /// Wire event name.
    #[must_use]
    pub fn event(&self) -> &'static str {
        match self {
            Self::UpdateField { .. } => "update_field",
            Self::AddLayer => "add_layer",
            Self::RemoveLayer { .. } => "remove_layer",
            Self::MoveLayer { .. } => "move_layer",
        }
    }

    /// Wire payload.
    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::UpdateField { field, value, idx, layer_id } => json!({
                "field": field,
                "value": value,
                "idx": idx,
                "layer_id": layer_id,
            }),
            Self::AddLayer => json!({}),
            Self::RemoveLayer { layer, layer_id } => json!({
                "layer": layer,
                "layer_id": layer_id,
            }),
            Self::MoveLayer { removed_index, added_index } => json!({
                "removedIndex": removed_index,
                "addedIndex": added_index,
            }),
        }
    }

    #[must_use]
    pub fn to_frame(&self) -> Frame {
        Frame::new(self.event(), self.payload())
    }
}

// =============================================================================
// INBOUND
// =============================================================================

/// Host → UI messages, applied in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    UpdateRoot { fields: Data },
    UpdateLayer { target: LayerRef, fields: Data },
    SetLayers { layers: Vec<Layer> },
    SetSourceVariables { source_variables: Vec<SourceVariable>, fields: Data },
    MissingDep { dep: Option<String> },
    /// Synchronization barrier: commit whatever the focused control holds.
    Sync,
}

#[derive(Deserialize)]
struct UpdateRootPayload {
    fields: Data,
}

#[derive(Deserialize)]
struct UpdateLayerPayload {
    #[serde(default)]
    idx: Option<usize>,
    #[serde(default)]
    layer_id: Option<LayerId>,
    fields: Data,
}

#[derive(Deserialize)]
struct SetLayersPayload {
    layers: Vec<Data>,
}

#[derive(Deserialize)]
struct SetSourceVariablesPayload {
    source_variables: Vec<SourceVariable>,
    #[serde(default)]
    fields: Data,
}

#[derive(Deserialize)]
struct MissingDepPayload {
    #[serde(default)]
    dep: Option<String>,
}

impl Inbound {
    /// Event names this side understands.
    pub const EVENTS: &'static [&'static str] =
        &["update_root", "update_layer", "set_layers", "set_source_variables", "missing_dep", "sync"];

    /// Parse a host frame.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::UnknownEvent`] for event names outside
    /// [`Self::EVENTS`], and [`MessageError::InvalidPayload`] or
    /// [`MessageError::MissingLayerRef`] for malformed payloads.
    pub fn from_frame(frame: &Frame) -> Result<Self, MessageError> {
        match frame.event.as_str() {
            "update_root" => {
                let p: UpdateRootPayload = parse(&frame.data, "update_root")?;
                Ok(Self::UpdateRoot { fields: p.fields })
            }
            "update_layer" => {
                let p: UpdateLayerPayload = parse(&frame.data, "update_layer")?;
                let target = match (p.layer_id, p.idx) {
                    (Some(id), _) => LayerRef::Id(id),
                    (None, Some(idx)) => LayerRef::Index(idx),
                    (None, None) => return Err(MessageError::MissingLayerRef),
                };
                Ok(Self::UpdateLayer { target, fields: p.fields })
            }
            "set_layers" => {
                let p: SetLayersPayload = parse(&frame.data, "set_layers")?;
                Ok(Self::SetLayers { layers: p.layers.into_iter().map(Layer::from_fields).collect() })
            }
            "set_source_variables" => {
                let p: SetSourceVariablesPayload = parse(&frame.data, "set_source_variables")?;
                Ok(Self::SetSourceVariables { source_variables: p.source_variables, fields: p.fields })
            }
            "missing_dep" => {
                let p: MissingDepPayload = parse(&frame.data, "missing_dep")?;
                Ok(Self::MissingDep { dep: p.dep })
            }
            "sync" => Ok(Self::Sync),
            other => Err(MessageError::UnknownEvent(other.to_owned())),
        }
    }
}

fn parse<T: DeserializeOwned>(data: &Value, event: &'static str) -> Result<T, MessageError> {
    serde_json::from_value(data.clone()).map_err(|source| MessageError::InvalidPayload { event, source })
}
