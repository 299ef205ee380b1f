//! Map-level fields: style, center, zoom, and provider credentials.

#[cfg(test)]
#[path = "root_test.rs"]
mod root_test;

use serde_json::Value;

use crate::Data;
use crate::center::{CENTER_FIELD, Center, coordinate_pair};
use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::layer::number_field;

/// Marker in a style name that requires provider credentials.
const COMMERCIAL_MARKER: &str = "(commercial)";

/// The map-level (non-layer) configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootFields {
    fields: Data,
}

impl RootFields {
    #[must_use]
    pub fn new(fields: Data) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn as_data(&self) -> &Data {
        &self.fields
    }

    /// Overwrite the named keys, leaving the rest untouched.
    pub fn apply(&mut self, patch: &Data) {
        for (key, value) in patch {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Selected style name. Defaults to `"default"`.
    #[must_use]
    pub fn style(&self) -> &str {
        self.fields.get("style").and_then(Value::as_str).unwrap_or("default")
    }

    /// Raw center text as stored.
    #[must_use]
    pub fn center_text(&self) -> &str {
        self.fields.get(CENTER_FIELD).and_then(Value::as_str).unwrap_or("")
    }

    /// Parsed center, if the stored text is a coordinate pair.
    #[must_use]
    pub fn center(&self) -> Option<Center> {
        coordinate_pair(self.center_text())
    }

    /// Zoom clamped to the slider range. Defaults to the minimum.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        number_field(&self.fields, "zoom")
            .unwrap_or(MIN_ZOOM)
            .clamp(MIN_ZOOM, MAX_ZOOM)
    }

    /// Whether the selected style needs a provider key.
    #[must_use]
    pub fn is_commercial(&self) -> bool {
        self.style().contains(COMMERCIAL_MARKER)
    }

    /// Whether the provider key is taken from a notebook secret rather than
    /// typed in.
    #[must_use]
    pub fn uses_key_secret(&self) -> bool {
        self.fields
            .get("use_maptiler_key_secret")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
