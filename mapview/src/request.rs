//! Interaction requests: what the host asks the map to do.
//!
//! Requests arrive two ways. The session-start payload carries an
//! [`InitialEvents`] batch grouped by kind; later requests arrive one frame
//! at a time and are parsed with [`InteractionRequest::from_frame`]. Both
//! produce the same [`InteractionRequest`] values so one handler serves both.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use frames::Frame;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Data;
use crate::camera::{Bounds, LngLat};
use crate::engine::{ControlPosition, Marker};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("unknown map event: {0}")]
    UnknownEvent(String),
    #[error("invalid payload for {event}: {source}")]
    InvalidPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl frames::ErrorCode for RequestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEvent(_) => "E_UNKNOWN_EVENT",
            Self::InvalidPayload { .. } => "E_INVALID_PAYLOAD",
        }
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NavControls {
    #[serde(default)]
    pub position: Option<ControlPosition>,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Locate {
    #[serde(default)]
    pub high_accuracy: bool,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportMap {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InfoOnClick {
    pub layer: String,
    pub property: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomImage {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JumpTo {
    pub location: LngLat,
    #[serde(default)]
    pub options: Data,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FitBounds {
    pub bounds: Bounds,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetFilter {
    pub layer: String,
    pub filter: Value,
}

/// A layer name given bare or as `{"layer": name}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayerName {
    Bare(String),
    Keyed { layer: String },
}

impl From<LayerName> for String {
    fn from(name: LayerName) -> Self {
        match name {
            LayerName::Bare(layer) | LayerName::Keyed { layer } => layer,
        }
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionRequest {
    AddMarker(Marker),
    AddNavControls(NavControls),
    AddLocate(Locate),
    AddTerrain,
    AddGeocode,
    AddFullscreen,
    AddScale { options: Value },
    AddExportMap(ExportMap),
    ClusterExpansion { layer: String },
    AddHover { layer: String },
    CenterOnClick { layer: String },
    InfoOnClick(InfoOnClick),
    AddCustomImage(CustomImage),
    JumpTo(JumpTo),
    FitBounds(FitBounds),
    SetFilter(SetFilter),
}

impl InteractionRequest {
    /// Live event names this side understands.
    pub const EVENTS: &'static [&'static str] = &[
        "add_markers",
        "add_marker",
        "add_nav_controls",
        "add_locate",
        "add_terrain",
        "add_geocode",
        "add_fullscreen",
        "add_scale",
        "add_export_map",
        "clusters_expansion",
        "add_hover",
        "center_on_click",
        "info_on_click",
        "add_custom_image",
        "jump_to",
        "fit_bounds",
        "set_filter",
    ];

    /// Parse a live request frame. `add_markers` expands to one request per
    /// marker.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnknownEvent`] for names outside
    /// [`Self::EVENTS`] and [`RequestError::InvalidPayload`] for payloads
    /// that do not match the event.
    pub fn from_frame(frame: &Frame) -> Result<Vec<Self>, RequestError> {
        let data = &frame.data;
        let request = match frame.event.as_str() {
            "add_markers" => {
                let markers: Vec<Marker> = parse(data, "add_markers")?;
                return Ok(markers.into_iter().map(Self::AddMarker).collect());
            }
            "add_marker" => Self::AddMarker(parse(data, "add_marker")?),
            "add_nav_controls" => Self::AddNavControls(parse(data, "add_nav_controls")?),
            "add_locate" => Self::AddLocate(parse(data, "add_locate")?),
            "add_terrain" => Self::AddTerrain,
            "add_geocode" => Self::AddGeocode,
            "add_fullscreen" => Self::AddFullscreen,
            "add_scale" => Self::AddScale { options: data.clone() },
            "add_export_map" => Self::AddExportMap(parse(data, "add_export_map")?),
            "clusters_expansion" => Self::ClusterExpansion { layer: layer(data, "clusters_expansion")? },
            "add_hover" => Self::AddHover { layer: layer(data, "add_hover")? },
            "center_on_click" => Self::CenterOnClick { layer: layer(data, "center_on_click")? },
            "info_on_click" => Self::InfoOnClick(parse(data, "info_on_click")?),
            "add_custom_image" => Self::AddCustomImage(parse(data, "add_custom_image")?),
            "jump_to" => Self::JumpTo(parse(data, "jump_to")?),
            "fit_bounds" => Self::FitBounds(parse(data, "fit_bounds")?),
            "set_filter" => Self::SetFilter(parse(data, "set_filter")?),
            other => return Err(RequestError::UnknownEvent(other.to_owned())),
        };
        Ok(vec![request])
    }

    /// Short name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddMarker(_) => "add_marker",
            Self::AddNavControls(_) => "add_nav_controls",
            Self::AddLocate(_) => "add_locate",
            Self::AddTerrain => "add_terrain",
            Self::AddGeocode => "add_geocode",
            Self::AddFullscreen => "add_fullscreen",
            Self::AddScale { .. } => "add_scale",
            Self::AddExportMap(_) => "add_export_map",
            Self::ClusterExpansion { .. } => "clusters_expansion",
            Self::AddHover { .. } => "add_hover",
            Self::CenterOnClick { .. } => "center_on_click",
            Self::InfoOnClick(_) => "info_on_click",
            Self::AddCustomImage(_) => "add_custom_image",
            Self::JumpTo(_) => "jump_to",
            Self::FitBounds(_) => "fit_bounds",
            Self::SetFilter(_) => "set_filter",
        }
    }
}

fn parse<T: DeserializeOwned>(data: &Value, event: &'static str) -> Result<T, RequestError> {
    serde_json::from_value(data.clone()).map_err(|source| RequestError::InvalidPayload { event, source })
}

fn layer(data: &Value, event: &'static str) -> Result<String, RequestError> {
    parse::<LayerName>(data, event).map(String::from)
}

// =============================================================================
// INITIAL BATCH
// =============================================================================

/// Requests bundled with the session-start payload, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InitialEvents {
    pub markers: Vec<Marker>,
    pub clusters: Vec<LayerName>,
    pub controls: Vec<NavControls>,
    pub locate: Vec<Locate>,
    pub terrain: Vec<Value>,
    pub geocode: Vec<Value>,
    pub fullscreen: Vec<Value>,
    pub scale: Vec<Value>,
    pub export_map: Vec<ExportMap>,
    pub hover: Vec<LayerName>,
    pub center: Vec<LayerName>,
    pub info: Vec<InfoOnClick>,
    pub images: Vec<CustomImage>,
    pub jumps: Vec<JumpTo>,
    pub fit_bounds: Vec<FitBounds>,
    pub filters: Vec<SetFilter>,
}

impl InitialEvents {
    /// Flatten into requests, group by group in a fixed order.
    #[must_use]
    pub fn into_requests(self) -> Vec<InteractionRequest> {
        use InteractionRequest as R;

        let mut out = Vec::new();
        out.extend(self.markers.into_iter().map(R::AddMarker));
        out.extend(self.clusters.into_iter().map(|l| R::ClusterExpansion { layer: l.into() }));
        out.extend(self.controls.into_iter().map(R::AddNavControls));
        out.extend(self.locate.into_iter().map(R::AddLocate));
        out.extend(self.terrain.iter().map(|_| R::AddTerrain));
        out.extend(self.geocode.iter().map(|_| R::AddGeocode));
        out.extend(self.fullscreen.iter().map(|_| R::AddFullscreen));
        out.extend(self.scale.into_iter().map(|options| R::AddScale { options }));
        out.extend(self.export_map.into_iter().map(R::AddExportMap));
        out.extend(self.hover.into_iter().map(|l| R::AddHover { layer: l.into() }));
        out.extend(self.center.into_iter().map(|l| R::CenterOnClick { layer: l.into() }));
        out.extend(self.info.into_iter().map(R::InfoOnClick));
        out.extend(self.images.into_iter().map(R::AddCustomImage));
        out.extend(self.jumps.into_iter().map(R::JumpTo));
        out.extend(self.fit_bounds.into_iter().map(R::FitBounds));
        out.extend(self.filters.into_iter().map(R::SetFilter));
        out
    }
}

/// Session-start payload for the map side.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapPayload {
    /// Style document handed to the engine as is.
    #[serde(default)]
    pub spec: Value,
    #[serde(default)]
    pub events: InitialEvents,
}
