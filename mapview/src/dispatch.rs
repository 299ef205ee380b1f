//! Interaction-request dispatcher.
//!
//! DESIGN
//! ======
//! The dispatcher owns the engine. Until the engine reports `load`, every
//! request is queued; [`MapDispatcher::on_load`] applies the initial batch
//! and then the queue, in order, through the same handler that serves live
//! requests afterwards.
//!
//! Layer behaviors (hover, center-on-click, info popup, cluster expansion)
//! are registered once per layer; repeating a registration changes nothing.
//! Controls are registered once per (kind, position).
//!
//! Only custom-image loading can fail. Everything else logs and carries on.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use std::collections::{HashMap, HashSet};

use frames::{ErrorCode, Frame};
use serde_json::{Value, json};

use crate::Data;
use crate::camera::{CameraOptions, LngLat, Point};
use crate::consts::{CLUSTER_ID_PROPERTY, CURSOR_DEFAULT, CURSOR_POINTER, HOVER_STATE};
use crate::engine::{Control, ControlPosition, EngineError, Feature, MapEngine, MapEvent, PositionOptions};
use crate::hover::{HoverChange, HoverTracker};
use crate::request::{CustomImage, InitialEvents, InteractionRequest};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("custom image {name}: {source}")]
    ImageLoad {
        name: String,
        #[source]
        source: EngineError,
    },
}

impl ErrorCode for DispatchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ImageLoad { .. } => "E_IMAGE_LOAD",
        }
    }
}

/// Click and hover behaviors registered on one style layer.
#[derive(Debug, Default)]
struct LayerBehaviors {
    hover: Option<HoverTracker>,
    center_on_click: bool,
    info_property: Option<String>,
    cluster_expansion: bool,
}

impl LayerBehaviors {
    fn reacts_to_click(&self) -> bool {
        self.center_on_click || self.info_property.is_some() || self.cluster_expansion
    }
}

pub struct MapDispatcher<E: MapEngine> {
    engine: E,
    loaded: bool,
    initial: Vec<InteractionRequest>,
    queued: Vec<InteractionRequest>,
    controls: HashSet<(&'static str, Option<ControlPosition>)>,
    layers: HashMap<String, LayerBehaviors>,
}

impl<E: MapEngine> MapDispatcher<E> {
    #[must_use]
    pub fn new(engine: E, initial: InitialEvents) -> Self {
        Self {
            engine,
            loaded: false,
            initial: initial.into_requests(),
            queued: Vec::new(),
            controls: HashSet::new(),
            layers: HashMap::new(),
        }
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Requests waiting for `load`.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.initial.len() + self.queued.len()
    }

    /// The engine finished loading its style. Applies the initial batch,
    /// then anything queued since. Failures are returned after every request
    /// has been attempted; one bad image does not block the rest.
    pub async fn on_load(&mut self) -> Vec<DispatchError> {
        if self.loaded {
            tracing::debug!("duplicate load event ignored");
            return Vec::new();
        }
        self.loaded = true;
        let mut backlog = std::mem::take(&mut self.initial);
        backlog.append(&mut self.queued);
        tracing::info!(count = backlog.len(), "map loaded; applying requests");

        let mut errors = Vec::new();
        for request in backlog {
            if let Err(e) = self.apply(request).await {
                tracing::error!(code = e.error_code(), error = %e, "request failed");
                errors.push(e);
            }
        }
        errors
    }

    /// Handle one live request: queue it before load, apply it after.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ImageLoad`] when a custom image cannot be
    /// loaded.
    pub async fn request(&mut self, request: InteractionRequest) -> Result<(), DispatchError> {
        if !self.loaded {
            tracing::debug!(kind = request.kind(), "queued until load");
            self.queued.push(request);
            return Ok(());
        }
        self.apply(request).await
    }

    /// Parse and handle a live request frame. Unknown or malformed frames
    /// are logged and ignored.
    ///
    /// # Errors
    ///
    /// See [`MapDispatcher::request`].
    pub async fn handle_frame(&mut self, frame: &Frame) -> Result<(), DispatchError> {
        let requests = match InteractionRequest::from_frame(frame) {
            Ok(requests) => requests,
            Err(e) => {
                tracing::warn!(code = e.error_code(), error = %e, "ignoring map frame");
                return Ok(());
            }
        };
        for request in requests {
            self.request(request).await?;
        }
        Ok(())
    }

    // =========================================================================
    // REQUESTS
    // =========================================================================

    async fn apply(&mut self, request: InteractionRequest) -> Result<(), DispatchError> {
        use InteractionRequest as R;

        match request {
            R::AddMarker(marker) => self.engine.add_marker(&marker),
            R::AddNavControls(nav) => {
                self.add_control(Control::Navigation { options: nav.options }, nav.position);
            }
            R::AddLocate(locate) => {
                let position = PositionOptions::new(locate.high_accuracy);
                self.add_control(Control::Geolocate { position, options: locate.options }, None);
            }
            R::AddTerrain => self.add_control(Control::Terrain, None),
            R::AddGeocode => self.add_control(Control::Geocoder, None),
            R::AddFullscreen => self.add_control(Control::Fullscreen, None),
            R::AddScale { options } => self.add_control(Control::Scale { options }, None),
            R::AddExportMap(export) => {
                let control = Control::Export { filename: export.filename, options: export.options };
                self.add_control(control, None);
            }
            R::ClusterExpansion { layer } => self.behaviors(&layer).cluster_expansion = true,
            R::AddHover { layer } => self.add_hover(&layer),
            R::CenterOnClick { layer } => self.behaviors(&layer).center_on_click = true,
            R::InfoOnClick(info) => {
                let behaviors = self.behaviors(&info.layer);
                if let Some(previous) = behaviors.info_property.replace(info.property) {
                    tracing::debug!(layer = %info.layer, %previous, "info popup property replaced");
                }
            }
            R::AddCustomImage(image) => return self.add_image(image).await,
            R::JumpTo(jump) => {
                self.engine.ease_to(&CameraOptions::from_options(jump.location, &jump.options));
            }
            R::FitBounds(fit) => self.engine.fit_bounds(fit.bounds, &fit.options),
            R::SetFilter(filter) => self.engine.set_filter(&filter.layer, &filter.filter),
        }
        Ok(())
    }

    fn add_control(&mut self, control: Control, position: Option<ControlPosition>) {
        if !self.controls.insert((control.kind(), position)) {
            tracing::debug!(kind = control.kind(), ?position, "control already added");
            return;
        }
        self.engine.add_control(&control, position);
    }

    fn behaviors(&mut self, layer: &str) -> &mut LayerBehaviors {
        self.layers.entry(layer.to_owned()).or_default()
    }

    fn add_hover(&mut self, layer: &str) {
        let Some(source) = self.engine.layer_source(layer) else {
            tracing::warn!(layer, "hover requested for a layer with no source");
            return;
        };
        let behaviors = self.behaviors(layer);
        if behaviors.hover.is_none() {
            behaviors.hover = Some(HoverTracker::new(source));
        }
    }

    async fn add_image(&mut self, image: CustomImage) -> Result<(), DispatchError> {
        match self.engine.load_image(&image.url).await {
            Ok(loaded) => {
                self.engine.add_image(&image.name, loaded, &image.options);
                Ok(())
            }
            Err(source) => Err(DispatchError::ImageLoad { name: image.name, source }),
        }
    }

    // =========================================================================
    // POINTER INPUT
    // =========================================================================

    /// Route pointer input on a layer to its registered behaviors.
    pub async fn handle_event(&mut self, event: MapEvent) {
        let Some(behaviors) = self.layers.get_mut(event.layer()) else {
            return;
        };
        match event {
            MapEvent::MouseMove { features, .. } => {
                if let Some(hover) = behaviors.hover.as_mut() {
                    let source = hover.source().to_owned();
                    let changes = hover.on_move(&features);
                    apply_hover(&mut self.engine, &source, changes);
                }
            }
            MapEvent::MouseEnter { .. } => {
                if behaviors.reacts_to_click() {
                    self.engine.set_cursor(CURSOR_POINTER);
                }
            }
            MapEvent::MouseLeave { .. } => {
                if let Some(hover) = behaviors.hover.as_mut() {
                    let source = hover.source().to_owned();
                    let changes = hover.on_leave();
                    apply_hover(&mut self.engine, &source, changes);
                }
                if behaviors.reacts_to_click() {
                    self.engine.set_cursor(CURSOR_DEFAULT);
                }
            }
            MapEvent::Click { layer, point, lng_lat, features } => {
                let cluster = behaviors.cluster_expansion;
                let center = behaviors.center_on_click;
                let info = behaviors.info_property.clone();
                if cluster {
                    self.expand_cluster(&layer, point).await;
                }
                if center {
                    self.center_on(&features);
                }
                if let Some(property) = info {
                    self.show_info(&features, lng_lat, &property);
                }
            }
        }
    }

    /// Zoom into the clicked cluster. Any missing piece or engine failure
    /// leaves the camera where it is.
    async fn expand_cluster(&mut self, layer: &str, point: Point) {
        let features = self.engine.query_rendered_features(point, layer);
        let Some(feature) = features.first() else {
            return;
        };
        let Some(cluster_id) = feature.properties.get(CLUSTER_ID_PROPERTY).and_then(Value::as_u64) else {
            tracing::debug!(layer, "clicked feature is not a cluster");
            return;
        };
        let (Some(source), Some(center)) = (self.engine.layer_source(layer), feature.coordinates) else {
            return;
        };
        match self.engine.cluster_expansion_zoom(&source, cluster_id).await {
            Ok(zoom) => self.engine.ease_to(&CameraOptions::centered(center).with_zoom(zoom)),
            Err(e) => tracing::debug!(error = %e, "cluster expansion zoom unavailable"),
        }
    }

    fn center_on(&mut self, features: &[Feature]) {
        if let Some(center) = features.first().and_then(|f| f.coordinates) {
            self.engine.ease_to(&CameraOptions::centered(center));
        }
    }

    fn show_info(&mut self, features: &[Feature], at: LngLat, property: &str) {
        match features.first().and_then(|f| f.property_text(property)) {
            Some(html) => self.engine.show_popup(at, &html),
            None => tracing::debug!(property, "clicked feature has no popup property"),
        }
    }
}

fn apply_hover<E: MapEngine>(engine: &mut E, source: &str, changes: Vec<HoverChange>) {
    for change in changes {
        let (id, on) = match change {
            HoverChange::Clear(id) => (id, false),
            HoverChange::Highlight(id) => (id, true),
        };
        let mut state = Data::new();
        state.insert(HOVER_STATE.to_owned(), json!(on));
        engine.set_feature_state(source, &id, &state);
    }
}
