//! Line-delimited JSON commands read from stdin by the headless drivers.
//!
//! Each line is one object tagged by `event`, e.g.
//! `{"event": "input", "field": "center", "value": "Paris"}`.

use form::controls::{ControlId, UiEvent};
use form::layer::LayerId;
use mapview::camera::{LngLat, Point};
use mapview::engine::{Feature, MapEvent};
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// FORM
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum FormCommand {
    Focus {
        field: String,
        #[serde(default)]
        layer: Option<LayerId>,
    },
    Input {
        field: String,
        #[serde(default)]
        layer: Option<LayerId>,
        value: Value,
    },
    Commit {
        field: String,
        #[serde(default)]
        layer: Option<LayerId>,
    },
    Blur {
        field: String,
        #[serde(default)]
        layer: Option<LayerId>,
    },
    Change {
        field: String,
        #[serde(default)]
        layer: Option<LayerId>,
        value: Value,
    },
    Toggle {
        field: String,
        #[serde(default)]
        layer: Option<LayerId>,
        checked: bool,
    },
    GroupCommit {
        field: String,
        #[serde(default)]
        layer: Option<LayerId>,
        slot: usize,
        value: Value,
    },
    Secret {
        field: String,
        secret: String,
    },
    AddLayer,
    RemoveLayer {
        layer: LayerId,
    },
    Drop {
        removed_index: usize,
        added_index: usize,
    },
    Show,
}

/// What a form stdin line asks for.
#[derive(Debug, PartialEq)]
pub enum FormInput {
    Ui(UiEvent),
    /// Print the current store contents.
    Show,
}

fn control(field: String, layer: Option<LayerId>) -> ControlId {
    ControlId { field, layer }
}

pub fn parse_form_line(line: &str) -> Result<FormInput, serde_json::Error> {
    let event = match serde_json::from_str::<FormCommand>(line)? {
        FormCommand::Focus { field, layer } => UiEvent::Focus(control(field, layer)),
        FormCommand::Input { field, layer, value } => UiEvent::Input { control: control(field, layer), value },
        FormCommand::Commit { field, layer } => UiEvent::Commit(control(field, layer)),
        FormCommand::Blur { field, layer } => UiEvent::Blur(control(field, layer)),
        FormCommand::Change { field, layer, value } => UiEvent::Change { control: control(field, layer), value },
        FormCommand::Toggle { field, layer, checked } => UiEvent::Toggle { control: control(field, layer), checked },
        FormCommand::GroupCommit { field, layer, slot, value } => {
            UiEvent::GroupCommit { control: control(field, layer), slot, value }
        }
        FormCommand::Secret { field, secret } => UiEvent::SecretSelected { field, secret },
        FormCommand::AddLayer => UiEvent::AddLayer,
        FormCommand::RemoveLayer { layer } => UiEvent::RemoveLayer(layer),
        FormCommand::Drop { removed_index, added_index } => UiEvent::Drop { removed_index, added_index },
        FormCommand::Show => return Ok(FormInput::Show),
    };
    Ok(FormInput::Ui(event))
}

// =============================================================================
// MAP
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum MapCommand {
    Loaded,
    Click {
        layer: String,
        point: Point,
        lng_lat: LngLat,
        #[serde(default)]
        features: Vec<Feature>,
    },
    MouseMove {
        layer: String,
        #[serde(default)]
        features: Vec<Feature>,
    },
    MouseEnter {
        layer: String,
    },
    MouseLeave {
        layer: String,
    },
    Search {
        query: String,
    },
}

/// What a map stdin line asks for.
#[derive(Debug, PartialEq)]
pub enum MapInput {
    /// The engine finished loading its style.
    Loaded,
    Event(MapEvent),
    /// Run a geocoder-control search and print the result.
    Search(String),
}

pub fn parse_map_line(line: &str) -> Result<MapInput, serde_json::Error> {
    let event = match serde_json::from_str::<MapCommand>(line)? {
        MapCommand::Loaded => return Ok(MapInput::Loaded),
        MapCommand::Search { query } => return Ok(MapInput::Search(query)),
        MapCommand::Click { layer, point, lng_lat, features } => MapEvent::Click { layer, point, lng_lat, features },
        MapCommand::MouseMove { layer, features } => MapEvent::MouseMove { layer, features },
        MapCommand::MouseEnter { layer } => MapEvent::MouseEnter { layer },
        MapCommand::MouseLeave { layer } => MapEvent::MouseLeave { layer },
    };
    Ok(MapInput::Event(event))
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;
