//! Layer records: identity, the open-ended field bag, and typed accessors.
//!
//! A layer is one styling rule bound to a data source. Its fields travel as a
//! flat JSON map because the host adds and removes keys between releases;
//! [`LayerProps`] gives typed, defaulted access to the keys the form knows.
//! Identity is a [`LayerId`] that stays fixed for the layer's lifetime. The
//! layer's position in the sequence is only used for display and for the
//! `idx` field the host still expects on the wire.

#[cfg(test)]
#[path = "layer_test.rs"]
mod layer_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Data;
use crate::consts::{CLUSTER_COLOR_SLOTS, MAX_OPACITY, MAX_RADIUS, MIN_OPACITY, MIN_RADIUS};

/// Field carrying a host-assigned layer id.
pub const LAYER_ID_FIELD: &str = "layer_id";

/// Stable opaque identifier for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Mint a fresh local id.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a layer paints its features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Circle,
    Fill,
    Line,
    Heatmap,
    Cluster,
}

impl LayerType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "circle" => Some(Self::Circle),
            "fill" => Some(Self::Fill),
            "line" => Some(Self::Line),
            "heatmap" => Some(Self::Heatmap),
            "cluster" => Some(Self::Cluster),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Fill => "fill",
            Self::Line => "line",
            Self::Heatmap => "heatmap",
            Self::Cluster => "cluster",
        }
    }

    /// Whether the radius slider applies.
    #[must_use]
    pub fn uses_radius(self) -> bool {
        matches!(self, Self::Circle | Self::Heatmap)
    }

    /// Whether the single color picker applies. Clusters use a color triple
    /// and heatmaps use a ramp.
    #[must_use]
    pub fn uses_color(self) -> bool {
        !matches!(self, Self::Cluster | Self::Heatmap)
    }

    /// Whether the opacity slider applies.
    #[must_use]
    pub fn uses_opacity(self) -> bool {
        self != Self::Cluster
    }
}

/// How point coordinates are laid out in a tabular source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatesFormat {
    /// Longitude and latitude in two separate columns.
    Columns,
    /// One column holding `"lng, lat"`.
    LngLat,
    /// One column holding `"lat, lng"`.
    LatLng,
}

impl CoordinatesFormat {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "columns" => Some(Self::Columns),
            "lng_lat" => Some(Self::LngLat),
            "lat_lng" => Some(Self::LatLng),
            _ => None,
        }
    }

    /// Column-reference fields shown for this format. The two sets are
    /// mutually exclusive.
    #[must_use]
    pub fn column_fields(self) -> &'static [&'static str] {
        match self {
            Self::Columns => &["source_longitude", "source_latitude"],
            Self::LngLat | Self::LatLng => &["source_coordinates"],
        }
    }
}

/// Where a layer's data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Tabular data with coordinate columns.
    Table,
    /// A geometry struct.
    Geo,
    /// A remote GeoJSON url.
    Url,
    /// A free-text place query geocoded by the host.
    Query,
}

impl SourceType {
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "table" => Some(Self::Table),
            "geo" => Some(Self::Geo),
            "url" => Some(Self::Url),
            "query" => Some(Self::Query),
            _ => None,
        }
    }
}

/// One layer in the ordered layer sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub fields: Data,
}

impl Layer {
    #[must_use]
    pub fn new(id: LayerId, fields: Data) -> Self {
        Self { id, fields }
    }

    /// Build a layer from a host payload. A `layer_id` string in the payload
    /// becomes the layer's identity; otherwise a local id is minted.
    #[must_use]
    pub fn from_fields(mut fields: Data) -> Self {
        let id = match fields.remove(LAYER_ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => LayerId::from(id),
            _ => LayerId::new(),
        };
        Self { id, fields }
    }

    /// A layer with no fields set.
    #[must_use]
    pub fn blank() -> Self {
        Self { id: LayerId::new(), fields: Data::new() }
    }

    #[must_use]
    pub fn props(&self) -> LayerProps<'_> {
        LayerProps::new(&self.fields)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Overwrite the named keys, leaving the rest untouched. The identity
    /// field is ignored.
    pub fn apply(&mut self, patch: &Data) {
        for (key, value) in patch {
            if key == LAYER_ID_FIELD {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

/// Typed access to common layer fields.
pub struct LayerProps<'a> {
    fields: &'a Data,
}

impl<'a> LayerProps<'a> {
    #[must_use]
    pub fn new(fields: &'a Data) -> Self {
        Self { fields }
    }

    fn str_field(&self, key: &str) -> &'a str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Name of the referenced source variable. Empty when unset.
    #[must_use]
    pub fn layer_source(&self) -> &'a str {
        self.str_field("layer_source")
    }

    #[must_use]
    pub fn layer_type(&self) -> Option<LayerType> {
        LayerType::parse(self.str_field("layer_type"))
    }

    #[must_use]
    pub fn source_type(&self) -> Option<SourceType> {
        SourceType::parse(self.str_field("source_type"))
    }

    /// Color as a CSS hex string. Empty when unset.
    #[must_use]
    pub fn layer_color(&self) -> &'a str {
        self.str_field("layer_color")
    }

    /// Opacity clamped to the slider range. Defaults to fully opaque.
    #[must_use]
    pub fn layer_opacity(&self) -> f64 {
        number_field(self.fields, "layer_opacity")
            .unwrap_or(MAX_OPACITY)
            .clamp(MIN_OPACITY, MAX_OPACITY)
    }

    /// Radius clamped to the slider range.
    #[must_use]
    pub fn layer_radius(&self) -> f64 {
        number_field(self.fields, "layer_radius")
            .unwrap_or(MIN_RADIUS)
            .clamp(MIN_RADIUS, MAX_RADIUS)
    }

    #[must_use]
    pub fn coordinates_format(&self) -> Option<CoordinatesFormat> {
        CoordinatesFormat::parse(self.str_field("coordinates_format"))
    }

    #[must_use]
    pub fn source_longitude(&self) -> &'a str {
        self.str_field("source_longitude")
    }

    #[must_use]
    pub fn source_latitude(&self) -> &'a str {
        self.str_field("source_latitude")
    }

    #[must_use]
    pub fn source_coordinates(&self) -> &'a str {
        self.str_field("source_coordinates")
    }

    #[must_use]
    pub fn cluster_min(&self) -> Option<f64> {
        number_field(self.fields, "cluster_min")
    }

    #[must_use]
    pub fn cluster_max(&self) -> Option<f64> {
        number_field(self.fields, "cluster_max")
    }

    /// Min / mid / max cluster colors. Missing slots are empty strings.
    #[must_use]
    pub fn cluster_colors(&self) -> [&'a str; CLUSTER_COLOR_SLOTS] {
        let mut colors = [""; CLUSTER_COLOR_SLOTS];
        if let Some(list) = self.fields.get("cluster_colors").and_then(Value::as_array) {
            for (slot, value) in colors.iter_mut().zip(list) {
                *slot = value.as_str().unwrap_or("");
            }
        }
        colors
    }

    #[must_use]
    pub fn layer_source_query(&self) -> &'a str {
        self.str_field("layer_source_query")
    }

    #[must_use]
    pub fn layer_source_query_strict(&self) -> &'a str {
        self.str_field("layer_source_query_strict")
    }

    /// Whether the layer is switched on. Layers are active unless the host
    /// says otherwise.
    #[must_use]
    pub fn active(&self) -> bool {
        self.fields.get("active").and_then(Value::as_bool).unwrap_or(true)
    }
}

/// Read a numeric field. Range inputs report their value as a string, so
/// numeric strings are accepted too.
pub(crate) fn number_field(fields: &Data, key: &str) -> Option<f64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) => Some(n),
            Err(_) => None,
        },
        _ => None,
    }
}
