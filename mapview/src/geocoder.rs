//! Forward geocoding for the geocoder control.
//!
//! A [`PlaceSearch`] backend returns candidate places with bounding boxes.
//! [`forward_geocode`] turns each into a point feature at the box midpoint,
//! the shape the geocoder control renders as a result list.

#[cfg(test)]
#[path = "geocoder_test.rs"]
mod geocoder_test;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Data;
use crate::camera::{Bounds, LngLat};
use crate::consts::GEOCODED_PLACE_TYPE;

/// One search result as returned by a GeoJSON search endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
    #[serde(default)]
    pub properties: Data,
}

impl SearchHit {
    fn display_name(&self) -> String {
        self.properties
            .get("display_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_owned()
    }
}

/// A free-text place search backend.
pub trait PlaceSearch {
    type Error: fmt::Display;

    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<SearchHit>, Self::Error>>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: LngLat,
}

/// A search result shaped as a geocoder-control feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: PointGeometry,
    pub place_name: String,
    pub properties: Data,
    pub text: String,
    pub place_type: Vec<&'static str>,
    pub center: LngLat,
}

impl GeocodedPlace {
    fn from_hit(hit: SearchHit) -> Option<Self> {
        let center = Bounds::from_bbox(hit.bbox?).center();
        let name = hit.display_name();
        Some(Self {
            kind: "Feature",
            geometry: PointGeometry { kind: "Point", coordinates: center },
            place_name: name.clone(),
            properties: hit.properties,
            text: name,
            place_type: vec![GEOCODED_PLACE_TYPE],
            center,
        })
    }
}

/// Result list for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForwardGeocode {
    pub features: Vec<GeocodedPlace>,
}

/// Search `query` and shape the hits. Search failures are logged and
/// produce an empty list; hits without a bounding box are skipped.
pub async fn forward_geocode<S: PlaceSearch>(search: &S, query: &str) -> ForwardGeocode {
    let hits = match search.search(query).await {
        Ok(hits) => hits,
        Err(e) => {
            tracing::error!(error = %e, query, "forward geocode failed");
            return ForwardGeocode::default();
        }
    };
    let features = hits
        .into_iter()
        .filter_map(|hit| {
            let place = GeocodedPlace::from_hit(hit);
            if place.is_none() {
                tracing::debug!(query, "skipping search hit without bbox");
            }
            place
        })
        .collect();
    ForwardGeocode { features }
}
