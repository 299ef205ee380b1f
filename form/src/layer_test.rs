#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn data(value: serde_json::Value) -> Data {
    match value {
        Value::Object(map) => map,
        _ => Data::new(),
    }
}

// =============================================================
// LayerId
// =============================================================

#[test]
fn minted_ids_are_unique() {
    assert_ne!(LayerId::new(), LayerId::new());
}

#[test]
fn layer_id_displays_inner_string() {
    assert_eq!(LayerId::from("l-1").to_string(), "l-1");
}

// =============================================================
// Layer construction
// =============================================================

#[test]
fn from_fields_takes_host_layer_id() {
    let layer = Layer::from_fields(data(json!({"layer_id": "abc", "layer_type": "fill"})));
    assert_eq!(layer.id, LayerId::from("abc"));
    assert!(layer.get(LAYER_ID_FIELD).is_none());
    assert_eq!(layer.props().layer_type(), Some(LayerType::Fill));
}

#[test]
fn from_fields_mints_id_when_absent() {
    let a = Layer::from_fields(data(json!({"layer_type": "fill"})));
    let b = Layer::from_fields(data(json!({"layer_type": "fill"})));
    assert_ne!(a.id, b.id);
}

#[test]
fn from_fields_mints_id_for_non_string_id() {
    let layer = Layer::from_fields(data(json!({"layer_id": 4})));
    assert_ne!(layer.id.as_str(), "4");
    assert!(layer.fields.is_empty());
}

#[test]
fn apply_overwrites_named_keys_only() {
    let mut layer = Layer::from_fields(data(json!({"layer_color": "#000000", "layer_opacity": 1.0})));
    layer.apply(&data(json!({"layer_color": "#ff0000"})));
    assert_eq!(layer.props().layer_color(), "#ff0000");
    assert_eq!(layer.props().layer_opacity(), 1.0);
}

#[test]
fn apply_ignores_identity_field() {
    let mut layer = Layer::from_fields(data(json!({"layer_id": "keep"})));
    layer.apply(&data(json!({"layer_id": "other"})));
    assert_eq!(layer.id, LayerId::from("keep"));
    assert!(layer.get(LAYER_ID_FIELD).is_none());
}

// =============================================================
// LayerProps
// =============================================================

#[test]
fn props_default_to_empty_values() {
    let layer = Layer::blank();
    let props = layer.props();
    assert_eq!(props.layer_source(), "");
    assert!(props.layer_type().is_none());
    assert!(props.coordinates_format().is_none());
    assert!(props.active());
    assert_eq!(props.cluster_colors(), ["", "", ""]);
}

#[test]
fn opacity_accepts_numeric_strings_and_clamps() {
    let layer = Layer::from_fields(data(json!({"layer_opacity": "0.4"})));
    assert_eq!(layer.props().layer_opacity(), 0.4);

    let layer = Layer::from_fields(data(json!({"layer_opacity": 0.0})));
    assert_eq!(layer.props().layer_opacity(), 0.1);
}

#[test]
fn radius_clamps_to_slider_range() {
    let layer = Layer::from_fields(data(json!({"layer_radius": 50})));
    assert_eq!(layer.props().layer_radius(), 20.0);

    let layer = Layer::from_fields(data(json!({"layer_radius": "7"})));
    assert_eq!(layer.props().layer_radius(), 7.0);
}

#[test]
fn cluster_colors_fill_missing_slots() {
    let layer = Layer::from_fields(data(json!({"cluster_colors": ["#111111", "#222222"]})));
    assert_eq!(layer.props().cluster_colors(), ["#111111", "#222222", ""]);
}

#[test]
fn cluster_bounds_parse_numbers() {
    let layer = Layer::from_fields(data(json!({"cluster_min": 100, "cluster_max": "750"})));
    assert_eq!(layer.props().cluster_min(), Some(100.0));
    assert_eq!(layer.props().cluster_max(), Some(750.0));
}

#[test]
fn active_reads_switch_state() {
    let layer = Layer::from_fields(data(json!({"active": false})));
    assert!(!layer.props().active());
}

#[test]
fn source_type_parses_known_values() {
    let layer = Layer::from_fields(data(json!({"source_type": "query"})));
    assert_eq!(layer.props().source_type(), Some(SourceType::Query));
    assert_eq!(SourceType::parse("bogus"), None);
}

// =============================================================
// Enums
// =============================================================

#[test]
fn layer_type_round_trips_names() {
    for name in crate::consts::TYPE_OPTIONS {
        let parsed = LayerType::parse(name).expect("known type");
        assert_eq!(parsed.as_str(), *name);
    }
    assert!(LayerType::parse("polygon").is_none());
}

#[test]
fn layer_type_control_visibility() {
    assert!(LayerType::Heatmap.uses_radius());
    assert!(LayerType::Circle.uses_radius());
    assert!(!LayerType::Fill.uses_radius());
    assert!(!LayerType::Cluster.uses_color());
    assert!(!LayerType::Heatmap.uses_color());
    assert!(LayerType::Line.uses_color());
    assert!(!LayerType::Cluster.uses_opacity());
}

#[test]
fn coordinates_format_column_fields_are_exclusive() {
    assert_eq!(CoordinatesFormat::Columns.column_fields(), &["source_longitude", "source_latitude"]);
    assert_eq!(CoordinatesFormat::LngLat.column_fields(), &["source_coordinates"]);
    assert_eq!(CoordinatesFormat::LatLng.column_fields(), &["source_coordinates"]);
}
