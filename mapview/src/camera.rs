#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::Data;

/// A geographic position. Serialized as `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

/// A point on the map canvas, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A south-west / north-east box. Serialized as `[[w, s], [e, n]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LngLat; 2]", into = "[LngLat; 2]")]
pub struct Bounds {
    pub sw: LngLat,
    pub ne: LngLat,
}

impl Bounds {
    /// From a GeoJSON bbox `[min_lng, min_lat, max_lng, max_lat]`.
    #[must_use]
    pub fn from_bbox([w, s, e, n]: [f64; 4]) -> Self {
        Self { sw: LngLat::new(w, s), ne: LngLat::new(e, n) }
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> LngLat {
        LngLat {
            lng: self.sw.lng + (self.ne.lng - self.sw.lng) / 2.0,
            lat: self.sw.lat + (self.ne.lat - self.sw.lat) / 2.0,
        }
    }
}

impl From<[LngLat; 2]> for Bounds {
    fn from([sw, ne]: [LngLat; 2]) -> Self {
        Self { sw, ne }
    }
}

impl From<Bounds> for [LngLat; 2] {
    fn from(b: Bounds) -> Self {
        [b.sw, b.ne]
    }
}

/// Target of a camera move. Fields the dispatcher does not interpret
/// (`duration`, `bearing`, `pitch`, ...) pass through in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LngLat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(flatten)]
    pub extra: Data,
}

impl CameraOptions {
    #[must_use]
    pub fn centered(center: LngLat) -> Self {
        Self { center: Some(center), ..Self::default() }
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Caller-supplied options with `center` taking precedence over any
    /// center they carry.
    #[must_use]
    pub fn from_options(center: LngLat, options: &Data) -> Self {
        let mut extra = options.clone();
        extra.remove("center");
        let zoom = extra.remove("zoom").and_then(|z| z.as_f64());
        Self { center: Some(center), zoom, extra }
    }
}
