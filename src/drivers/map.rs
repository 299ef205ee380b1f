//! Headless map driver.
//!
//! [`TracingEngine`] stands in for a rendering engine: every call the
//! dispatcher makes is logged, custom images are actually fetched, and layer
//! sources come from the style document in the `init` frame.

use std::collections::HashMap;

use frames::ErrorCode;
use mapview::Data;
use mapview::camera::{Bounds, CameraOptions, LngLat, Point};
use mapview::dispatch::MapDispatcher;
use mapview::engine::{Control, ControlPosition, EngineError, Feature, FeatureId, MapEngine, Marker};
use mapview::geocoder::forward_geocode;
use mapview::request::MapPayload;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{MapInput, parse_map_line};
use crate::config::CellConfig;
use crate::error::CellError;
use crate::services::geocode::NominatimClient;
use crate::transport::HostConnection;

// =============================================================================
// ENGINE
// =============================================================================

pub struct TracingEngine {
    layer_sources: HashMap<String, String>,
    http: reqwest::Client,
}

impl TracingEngine {
    /// Index `layers[].{id, source}` from a style document.
    pub fn from_style(style: &Value, http: reqwest::Client) -> Self {
        let layer_sources = style
            .get("layers")
            .and_then(Value::as_array)
            .map(|layers| {
                layers
                    .iter()
                    .filter_map(|layer| {
                        let id = layer.get("id")?.as_str()?;
                        let source = layer.get("source")?.as_str()?;
                        Some((id.to_owned(), source.to_owned()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { layer_sources, http }
    }
}

impl MapEngine for TracingEngine {
    type Image = Vec<u8>;

    fn add_marker(&mut self, marker: &Marker) {
        tracing::info!(lng = marker.location.lng, lat = marker.location.lat, "add marker");
    }

    fn add_control(&mut self, control: &Control, position: Option<ControlPosition>) {
        tracing::info!(control = control.kind(), ?position, "add control");
    }

    fn layer_source(&self, layer: &str) -> Option<String> {
        self.layer_sources.get(layer).cloned()
    }

    fn set_feature_state(&mut self, source: &str, id: &FeatureId, state: &Data) {
        tracing::info!(source, %id, ?state, "set feature state");
    }

    fn ease_to(&mut self, camera: &CameraOptions) {
        tracing::info!(center = ?camera.center, zoom = ?camera.zoom, "ease to");
    }

    fn fit_bounds(&mut self, bounds: Bounds, options: &Value) {
        tracing::info!(?bounds, %options, "fit bounds");
    }

    fn show_popup(&mut self, at: LngLat, html: &str) {
        tracing::info!(lng = at.lng, lat = at.lat, html, "show popup");
    }

    fn set_cursor(&mut self, cursor: &str) {
        tracing::debug!(cursor, "set cursor");
    }

    fn set_filter(&mut self, layer: &str, filter: &Value) {
        tracing::info!(layer, %filter, "set filter");
    }

    fn query_rendered_features(&self, point: Point, layer: &str) -> Vec<Feature> {
        tracing::debug!(x = point.x, y = point.y, layer, "nothing rendered to query");
        Vec::new()
    }

    async fn load_image(&self, url: &str) -> Result<Vec<u8>, EngineError> {
        let failed = |reason: String| EngineError::ImageLoad { url: url.to_owned(), reason };
        let response = self.http.get(url).send().await.map_err(|e| failed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("status {status}")));
        }
        let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn add_image(&mut self, name: &str, image: Vec<u8>, options: &Value) {
        tracing::info!(name, bytes = image.len(), %options, "add image");
    }

    async fn cluster_expansion_zoom(&self, source: &str, cluster_id: u64) -> Result<f64, EngineError> {
        if !self.layer_sources.values().any(|s| s == source) {
            return Err(EngineError::UnknownSource(source.to_owned()));
        }
        Err(EngineError::Cluster {
            source_id: source.to_owned(),
            cluster_id,
            reason: "no cluster index without a renderer".into(),
        })
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub async fn run(config: &CellConfig, cell_id: String) -> Result<(), CellError> {
    let url = config.require_host_url()?;
    let geocoder = NominatimClient::new(config)?;
    let mut conn = HostConnection::connect(url, config.wire, cell_id).await?;

    let init = conn.wait_for("init").await?;
    let payload: MapPayload = serde_json::from_value(init.data).map_err(CellError::InvalidInit)?;
    let engine = TracingEngine::from_style(&payload.spec, geocoder.http().clone());
    let mut dispatcher = MapDispatcher::new(engine, payload.events);
    tracing::info!("map session started; waiting for load");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            frame = conn.recv() => match frame? {
                Some(frame) => {
                    if let Err(e) = dispatcher.handle_frame(&frame).await {
                        tracing::error!(code = e.error_code(), error = %e, event = %frame.event, "map request failed");
                    }
                }
                None => {
                    tracing::info!("host closed the session");
                    return Ok(());
                }
            },
            line = stdin.next_line(), if stdin_open => match line? {
                Some(line) => handle_line(&mut dispatcher, &geocoder, &line).await,
                None => {
                    tracing::debug!("stdin closed; serving host frames only");
                    stdin_open = false;
                }
            },
        }
    }
}

async fn handle_line(
    dispatcher: &mut MapDispatcher<TracingEngine>,
    geocoder: &NominatimClient,
    line: &str,
) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match parse_map_line(line) {
        Ok(MapInput::Loaded) => {
            let failed = dispatcher.on_load().await.len();
            if failed > 0 {
                tracing::warn!(failed, "some initial requests failed");
            }
        }
        Ok(MapInput::Event(event)) => dispatcher.handle_event(event).await,
        Ok(MapInput::Search(query)) => {
            let result = forward_geocode(geocoder, &query).await;
            match serde_json::to_string(&result) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!(error = %e, %query, "failed to render search result"),
            }
        }
        Err(e) => tracing::warn!(error = %e, line, "unreadable map command"),
    }
}

#[cfg(test)]
#[path = "map_test.rs"]
mod tests;
