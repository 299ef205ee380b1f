use serde_json::json;

use super::*;

#[test]
fn feature_id_accepts_numbers_and_strings() {
    let n: FeatureId = serde_json::from_value(json!(7)).expect("number");
    let s: FeatureId = serde_json::from_value(json!("abc")).expect("string");
    assert_eq!(n, FeatureId::Number(7));
    assert_eq!(s, FeatureId::Text("abc".into()));
    assert_eq!(n.to_string(), "7");
}

#[test]
fn feature_reads_point_coordinates() {
    let f: Feature = serde_json::from_value(json!({
        "id": 3,
        "coordinates": [10.0, 20.0],
        "properties": {"cluster_id": 12, "name": "x"}
    }))
    .expect("feature");
    assert_eq!(f.id, Some(FeatureId::Number(3)));
    assert_eq!(f.coordinates, Some(LngLat::new(10.0, 20.0)));
}

#[test]
fn property_text_renders_values() {
    let f: Feature = serde_json::from_value(json!({
        "properties": {"name": "<b>Lisbon</b>", "pop": 545_000, "none": null}
    }))
    .expect("feature");
    assert_eq!(f.property_text("name").as_deref(), Some("<b>Lisbon</b>"));
    assert_eq!(f.property_text("pop").as_deref(), Some("545000"));
    assert!(f.property_text("none").is_none());
    assert!(f.property_text("missing").is_none());
}

#[test]
fn control_position_uses_kebab_case() {
    let p: ControlPosition = serde_json::from_value(json!("bottom-left")).expect("position");
    assert_eq!(p, ControlPosition::BottomLeft);
}

#[test]
fn geolocate_defaults() {
    let opts = PositionOptions::new(true);
    assert!(opts.enable_high_accuracy);
    assert_eq!(opts.maximum_age_ms, 0);
    assert_eq!(opts.timeout_ms, 6000);
}

#[test]
fn control_kinds_are_distinct() {
    let controls = [
        Control::Navigation { options: Value::Null },
        Control::Geolocate { position: PositionOptions::new(false), options: Value::Null },
        Control::Terrain,
        Control::Geocoder,
        Control::Fullscreen,
        Control::Scale { options: Value::Null },
        Control::Export { filename: None, options: Value::Null },
    ];
    let mut kinds: Vec<_> = controls.iter().map(Control::kind).collect();
    kinds.sort_unstable();
    kinds.dedup();
    assert_eq!(kinds.len(), controls.len());
}

#[test]
fn map_event_layer() {
    let event = MapEvent::MouseEnter { layer: "quakes".into() };
    assert_eq!(event.layer(), "quakes");
}
