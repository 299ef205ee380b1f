//! Form state store: the single source of truth for the configuration form.
//!
//! DESIGN
//! ======
//! The store holds host-confirmed state only. Local edits flow out through
//! the sync channel and come back as patches; nothing in this module is
//! called with a locally-typed value. Availability of select values is
//! computed on read from the current source list, so a source disappearing
//! and reappearing never changes what is stored.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::Data;
use crate::features::FormFeatures;
use crate::layer::{Layer, LayerId, SourceType};
use crate::root::RootFields;
use crate::source::SourceVariable;

// =============================================================================
// TYPES
// =============================================================================

/// How an inbound patch names its target layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerRef {
    /// Stable identity.
    Id(LayerId),
    /// Position in the layer sequence.
    Index(usize),
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Index(idx) => write!(f, "index {idx}"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("layer not found: {0}")]
    LayerNotFound(LayerRef),
}

impl frames::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::LayerNotFound(_) => "E_LAYER_NOT_FOUND",
        }
    }
}

/// Session-start payload sent by the host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitPayload {
    #[serde(default)]
    pub root_fields: Data,
    #[serde(default)]
    pub layers: Vec<Data>,
    #[serde(default)]
    pub source_variables: Vec<SourceVariable>,
    #[serde(default)]
    pub missing_dep: Option<String>,
}

// =============================================================================
// STORE
// =============================================================================

/// Root fields, the ordered layer sequence, and the available sources.
#[derive(Debug, Clone)]
pub struct FormStore {
    features: FormFeatures,
    root: RootFields,
    layers: Vec<Layer>,
    sources: Vec<SourceVariable>,
    missing_dep: Option<String>,
}

impl FormStore {
    /// Build the store from the session-start payload.
    #[must_use]
    pub fn new(features: FormFeatures, payload: InitPayload) -> Self {
        let mut store = Self {
            features,
            root: RootFields::new(payload.root_fields),
            layers: Vec::new(),
            sources: payload.source_variables,
            missing_dep: payload.missing_dep,
        };
        store.replace_layers(payload.layers.into_iter().map(Layer::from_fields).collect());
        store
    }

    // --- Host-driven mutation ---

    /// Overwrite the named root keys. No validation; the host is trusted.
    pub fn apply_root_patch(&mut self, fields: &Data) {
        self.root.apply(fields);
    }

    /// Overwrite the named keys on one layer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LayerNotFound`] when the reference matches no
    /// layer. Nothing is mutated in that case.
    pub fn apply_layer_patch(&mut self, target: &LayerRef, fields: &Data) -> Result<(), StoreError> {
        let Some(position) = self.position(target) else {
            return Err(StoreError::LayerNotFound(target.clone()));
        };
        self.layers[position].apply(fields);
        Ok(())
    }

    /// Replace the whole layer sequence. An empty sequence is replaced by a
    /// single blank layer so the form always has one layer to render.
    pub fn replace_layers(&mut self, layers: Vec<Layer>) {
        if layers.is_empty() {
            tracing::warn!("host sent an empty layer list; keeping one blank layer");
            self.layers = vec![Layer::blank()];
            return;
        }
        self.layers = layers;
    }

    /// Replace the available sources and re-patch the first layer so its
    /// column selects re-validate against the new list.
    pub fn replace_source_variables(&mut self, sources: Vec<SourceVariable>, fields: &Data) {
        self.sources = sources;
        if let Err(e) = self.apply_layer_patch(&LayerRef::Index(0), fields) {
            tracing::warn!(error = %e, "source refresh could not patch the first layer");
        }
    }

    pub fn set_missing_dep(&mut self, dep: Option<String>) {
        self.missing_dep = dep.filter(|d| !d.is_empty());
    }

    // --- Queries ---

    #[must_use]
    pub fn features(&self) -> FormFeatures {
        self.features
    }

    #[must_use]
    pub fn root(&self) -> &RootFields {
        &self.root
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    #[must_use]
    pub fn sources(&self) -> &[SourceVariable] {
        &self.sources
    }

    /// Dependency advisory to display, if any.
    #[must_use]
    pub fn missing_dep(&self) -> Option<&str> {
        self.missing_dep.as_deref()
    }

    /// Resolve a layer reference to its current position.
    #[must_use]
    pub fn position(&self, target: &LayerRef) -> Option<usize> {
        match target {
            LayerRef::Id(id) => self.layers.iter().position(|l| &l.id == id),
            LayerRef::Index(idx) => (*idx < self.layers.len()).then_some(*idx),
        }
    }

    #[must_use]
    pub fn layer(&self, target: &LayerRef) -> Option<&Layer> {
        self.position(target).map(|p| &self.layers[p])
    }

    /// Stored value of a root field (`layer == None`) or a layer field.
    #[must_use]
    pub fn field_value(&self, field: &str, layer: Option<&LayerId>) -> Option<&Value> {
        match layer {
            None => self.root.get(field),
            Some(id) => self.layer(&LayerRef::Id(id.clone()))?.get(field),
        }
    }

    // --- Derived view state ---

    /// True when the first layer has no source. Shows the "no source"
    /// advisory and disables source-dependent controls.
    #[must_use]
    pub fn no_source_variable(&self) -> bool {
        self.layers
            .first()
            .map_or(true, |l| l.props().layer_source().is_empty())
    }

    /// Whether source-dependent controls (and add/remove) are enabled.
    #[must_use]
    pub fn controls_enabled(&self) -> bool {
        !self.no_source_variable()
    }

    /// More than one layer: layers render as collapsible cards with a remove
    /// button.
    #[must_use]
    pub fn has_layers(&self) -> bool {
        self.layers.len() > 1
    }

    /// Names offered by the source select.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.variable.as_str()).collect()
    }

    /// Columns offered by the column selects of `layer`.
    #[must_use]
    pub fn source_options(&self, layer: &Layer) -> &[String] {
        match self.source_for(layer) {
            Some(source) => &source.columns,
            None => &[],
        }
    }

    fn source_for(&self, layer: &Layer) -> Option<&SourceVariable> {
        let name = layer.props().layer_source();
        self.sources.iter().find(|s| s.variable == name)
    }

    /// Whether the stored value of a select is among its current options.
    /// Empty values and free-form fields are always available.
    #[must_use]
    pub fn field_available(&self, layer: &Layer, field: &str) -> bool {
        let Some(value) = layer.get(field).and_then(Value::as_str) else {
            return true;
        };
        if value.is_empty() {
            return true;
        }
        match field {
            "layer_source" => self.sources.iter().any(|s| s.variable == value),
            "source_longitude" | "source_latitude" | "source_coordinates" => {
                self.source_for(layer).is_some_and(|s| s.has_column(value))
            }
            "layer_type" => self
                .features
                .type_options(layer.props().source_type())
                .contains(&value),
            _ => true,
        }
    }

    /// Accordion title for the layer at `position`.
    #[must_use]
    pub fn layer_title(position: usize) -> String {
        format!("Layer {}", position + 1)
    }

    /// Collapsed-accordion summary: source and type, or the geocode query for
    /// query layers.
    #[must_use]
    pub fn layer_subtitle(&self, layer: &Layer) -> String {
        let props = layer.props();
        let kind = props.layer_type().map_or("", |t| t.as_str());
        let query = props.layer_source_query();
        if self.features.query_sources && props.source_type() == Some(SourceType::Query) && !query.is_empty() {
            format!("{}: {query} - {kind}", props.layer_source())
        } else {
            format!("{} - {kind}", props.layer_source())
        }
    }
}
