//! The map engine capability boundary.
//!
//! The dispatcher never renders anything itself. It drives an engine through
//! [`MapEngine`], which mirrors the imperative configuration calls a web map
//! library exposes. Pointer input comes back in as [`MapEvent`]s.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Data;
use crate::camera::{Bounds, CameraOptions, LngLat, Point};
use crate::consts::{GEOLOCATE_MAXIMUM_AGE_MS, GEOLOCATE_TIMEOUT_MS};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("failed to load image {url}: {reason}")]
    ImageLoad { url: String, reason: String },
    #[error("no source {0}")]
    UnknownSource(String),
    #[error("cluster {cluster_id} on {source_id}: {reason}")]
    Cluster { source_id: String, cluster_id: u64, reason: String },
}

impl frames::ErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ImageLoad { .. } => "E_IMAGE_LOAD",
            Self::UnknownSource(_) => "E_UNKNOWN_SOURCE",
            Self::Cluster { .. } => "E_CLUSTER",
        }
    }
}

// =============================================================================
// FEATURES
// =============================================================================

/// Feature identifier. GeoJSON allows numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Number(u64),
    Text(String),
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for FeatureId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

/// A rendered feature as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<FeatureId>,
    /// Point geometry coordinates. `None` for non-point geometries.
    #[serde(default)]
    pub coordinates: Option<LngLat>,
    #[serde(default)]
    pub properties: Data,
}

impl Feature {
    /// A property rendered as popup text. Strings are used as is; other
    /// values use their JSON form.
    #[must_use]
    pub fn property_text(&self, name: &str) -> Option<String> {
        match self.properties.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

// =============================================================================
// CONTROLS AND MARKERS
// =============================================================================

/// Screen corner a control is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Geolocation request settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub maximum_age_ms: u64,
    pub timeout_ms: u64,
}

impl PositionOptions {
    #[must_use]
    pub fn new(enable_high_accuracy: bool) -> Self {
        Self {
            enable_high_accuracy,
            maximum_age_ms: GEOLOCATE_MAXIMUM_AGE_MS,
            timeout_ms: GEOLOCATE_TIMEOUT_MS,
        }
    }
}

/// A map control. `options` are passed through to the engine untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Navigation { options: Value },
    Geolocate { position: PositionOptions, options: Value },
    Terrain,
    Geocoder,
    Fullscreen,
    Scale { options: Value },
    Export { filename: Option<String>, options: Value },
}

impl Control {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Navigation { .. } => "navigation",
            Self::Geolocate { .. } => "geolocate",
            Self::Terrain => "terrain",
            Self::Geocoder => "geocoder",
            Self::Fullscreen => "fullscreen",
            Self::Scale { .. } => "scale",
            Self::Export { .. } => "export",
        }
    }
}

/// A marker pinned at `location`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub location: LngLat,
    #[serde(default)]
    pub options: Value,
}

// =============================================================================
// INPUT
// =============================================================================

/// Pointer input on a layer, reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Click { layer: String, point: Point, lng_lat: LngLat, features: Vec<Feature> },
    MouseMove { layer: String, features: Vec<Feature> },
    MouseEnter { layer: String },
    MouseLeave { layer: String },
}

impl MapEvent {
    #[must_use]
    pub fn layer(&self) -> &str {
        match self {
            Self::Click { layer, .. }
            | Self::MouseMove { layer, .. }
            | Self::MouseEnter { layer }
            | Self::MouseLeave { layer } => layer,
        }
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Imperative calls the dispatcher makes into a map engine.
///
/// Synchronous calls are fire-and-forget. The two asynchronous calls return
/// errors the dispatcher decides how to treat.
pub trait MapEngine {
    /// Decoded image handle produced by [`MapEngine::load_image`].
    type Image;

    fn add_marker(&mut self, marker: &Marker);

    /// Add a control. `None` uses the engine's default corner.
    fn add_control(&mut self, control: &Control, position: Option<ControlPosition>);

    /// Source id backing a style layer, if the layer exists.
    fn layer_source(&self, layer: &str) -> Option<String>;

    fn set_feature_state(&mut self, source: &str, id: &FeatureId, state: &Data);

    fn ease_to(&mut self, camera: &CameraOptions);

    fn fit_bounds(&mut self, bounds: Bounds, options: &Value);

    fn show_popup(&mut self, at: LngLat, html: &str);

    fn set_cursor(&mut self, cursor: &str);

    fn set_filter(&mut self, layer: &str, filter: &Value);

    fn query_rendered_features(&self, point: Point, layer: &str) -> Vec<Feature>;

    fn load_image(&self, url: &str) -> impl Future<Output = Result<Self::Image, EngineError>>;

    fn add_image(&mut self, name: &str, image: Self::Image, options: &Value);

    /// Zoom level at which `cluster_id` on `source` splits apart.
    fn cluster_expansion_zoom(&self, source: &str, cluster_id: u64) -> impl Future<Output = Result<f64, EngineError>>;
}
