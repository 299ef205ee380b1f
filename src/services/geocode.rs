//! Nominatim geocoding client.
//!
//! Two queries are used: a single best match for the form's center field,
//! and a GeoJSON result list for the map's geocoder control. Response
//! parsing is split out so it can be tested without a network.

use std::time::Duration;

use form::center::Place;
use mapview::geocoder::{PlaceSearch, SearchHit};
use serde::Deserialize;

use crate::config::CellConfig;

const USER_AGENT: &str = concat!("mapcell/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("failed to build http client: {0}")]
    HttpClientBuild(String),
    #[error("geocoder request failed: {0}")]
    Request(String),
    #[error("geocoder returned {status}: {body}")]
    Response { status: u16, body: String },
    #[error("geocoder response unreadable: {0}")]
    Parse(#[from] serde_json::Error),
}

impl frames::ErrorCode for GeocodeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT",
            Self::Request(_) => "E_GEOCODE_REQUEST",
            Self::Response { .. } => "E_GEOCODE_RESPONSE",
            Self::Parse(_) => "E_GEOCODE_PARSE",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &CellConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| GeocodeError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.geocoder_url.clone() })
    }

    /// Shared HTTP client, reused for other outbound fetches.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Best match for a free-text place name, if any.
    pub async fn lookup_point(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
        let text = self.get_search(&[("q", query), ("format", "json"), ("limit", "1")]).await?;
        parse_point_response(&text)
    }

    /// Candidate places with bounding boxes, as GeoJSON features.
    pub async fn search_places(&self, query: &str) -> Result<Vec<SearchHit>, GeocodeError> {
        let params = [
            ("q", query),
            ("format", "geojson"),
            ("polygon_geojson", "1"),
            ("addressdetails", "1"),
        ];
        let text = self.get_search(&params).await?;
        parse_places_response(&text)
    }

    async fn get_search(&self, params: &[(&str, &str)]) -> Result<String, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;
        if status != 200 {
            return Err(GeocodeError::Response { status, body: text });
        }
        Ok(text)
    }
}

impl PlaceSearch for NominatimClient {
    type Error = GeocodeError;

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GeocodeError> {
        self.search_places(query).await
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// `format=json` result row. Coordinates arrive as decimal strings.
#[derive(Deserialize)]
struct PointRow {
    lon: String,
    lat: String,
}

#[derive(Deserialize)]
struct PlacesCollection {
    #[serde(default)]
    features: Vec<SearchHit>,
}

pub(crate) fn parse_point_response(text: &str) -> Result<Option<Place>, GeocodeError> {
    let rows: Vec<PointRow> = serde_json::from_str(text)?;
    let Some(row) = rows.first() else {
        return Ok(None);
    };
    match (row.lon.parse::<f64>(), row.lat.parse::<f64>()) {
        (Ok(lon), Ok(lat)) => Ok(Some(Place { lon, lat })),
        _ => {
            tracing::warn!(lon = %row.lon, lat = %row.lat, "geocoder returned non-numeric coordinates");
            Ok(None)
        }
    }
}

pub(crate) fn parse_places_response(text: &str) -> Result<Vec<SearchHit>, GeocodeError> {
    let collection: PlacesCollection = serde_json::from_str(text)?;
    Ok(collection.features)
}

#[cfg(test)]
#[path = "geocode_test.rs"]
mod tests;
