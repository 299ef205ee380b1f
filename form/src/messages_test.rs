use serde_json::json;

use super::*;

fn frame(event: &str, data: Value) -> Frame {
    Frame {
        id: "f-1".to_owned(),
        ts: 1,
        cell_id: None,
        event: event.to_owned(),
        data,
    }
}

// =============================================================
// Outbound
// =============================================================

#[test]
fn update_field_root_payload_has_null_idx() {
    let msg = Outbound::UpdateField {
        field: "zoom".into(),
        value: json!("4"),
        idx: None,
        layer_id: None,
    };
    assert_eq!(msg.event(), "update_field");
    assert_eq!(msg.payload(), json!({"field": "zoom", "value": "4", "idx": null, "layer_id": null}));
}

#[test]
fn update_field_layer_payload_carries_position_and_id() {
    let msg = Outbound::UpdateField {
        field: "layer_color".into(),
        value: json!("#ff0000"),
        idx: Some(2),
        layer_id: Some(LayerId::from("l-3")),
    };
    assert_eq!(msg.payload()["idx"], json!(2));
    assert_eq!(msg.payload()["layer_id"], json!("l-3"));
}

#[test]
fn add_layer_has_empty_payload() {
    let frame = Outbound::AddLayer.to_frame();
    assert_eq!(frame.event, "add_layer");
    assert_eq!(frame.data, json!({}));
}

#[test]
fn remove_layer_payload_uses_layer_key() {
    let msg = Outbound::RemoveLayer { layer: 1, layer_id: LayerId::from("x") };
    assert_eq!(msg.payload(), json!({"layer": 1, "layer_id": "x"}));
}

#[test]
fn move_layer_payload_uses_camel_case_keys() {
    let msg = Outbound::MoveLayer { removed_index: 0, added_index: 2 };
    assert_eq!(msg.event(), "move_layer");
    assert_eq!(msg.payload(), json!({"removedIndex": 0, "addedIndex": 2}));
}

// =============================================================
// Inbound
// =============================================================

#[test]
fn parses_update_root() {
    let msg = Inbound::from_frame(&frame("update_root", json!({"fields": {"zoom": 3}}))).expect("parse");
    let Inbound::UpdateRoot { fields } = msg else {
        panic!("expected UpdateRoot");
    };
    assert_eq!(fields.get("zoom"), Some(&json!(3)));
}

#[test]
fn update_layer_prefers_layer_id_over_idx() {
    let msg = Inbound::from_frame(&frame(
        "update_layer",
        json!({"idx": 0, "layer_id": "l-9", "fields": {"layer_type": "line"}}),
    ))
    .expect("parse");
    assert!(matches!(msg, Inbound::UpdateLayer { target: LayerRef::Id(ref id), .. } if id.as_str() == "l-9"));
}

#[test]
fn update_layer_falls_back_to_idx() {
    let msg = Inbound::from_frame(&frame("update_layer", json!({"idx": 2, "fields": {}}))).expect("parse");
    assert!(matches!(msg, Inbound::UpdateLayer { target: LayerRef::Index(2), .. }));
}

#[test]
fn update_layer_without_target_is_rejected() {
    let err = Inbound::from_frame(&frame("update_layer", json!({"fields": {}}))).expect_err("no target");
    assert!(matches!(err, MessageError::MissingLayerRef));
}

#[test]
fn parses_set_layers_with_ids() {
    let msg = Inbound::from_frame(&frame(
        "set_layers",
        json!({"layers": [{"layer_id": "a", "layer_type": "fill"}, {"layer_type": "line"}]}),
    ))
    .expect("parse");
    let Inbound::SetLayers { layers } = msg else {
        panic!("expected SetLayers");
    };
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].id, LayerId::from("a"));
}

#[test]
fn parses_set_source_variables() {
    let msg = Inbound::from_frame(&frame(
        "set_source_variables",
        json!({
            "source_variables": [{"variable": "quakes", "columns": ["lat", "lng"], "type": "table"}],
            "fields": {"layer_source": "quakes"}
        }),
    ))
    .expect("parse");
    let Inbound::SetSourceVariables { source_variables, fields } = msg else {
        panic!("expected SetSourceVariables");
    };
    assert_eq!(source_variables[0].variable, "quakes");
    assert_eq!(source_variables[0].kind.as_deref(), Some("table"));
    assert_eq!(fields.get("layer_source"), Some(&json!("quakes")));
}

#[test]
fn parses_missing_dep_and_sync() {
    let msg = Inbound::from_frame(&frame("missing_dep", json!({"dep": "{:maplibre, \"~> 0.1\"}"}))).expect("parse");
    assert!(matches!(msg, Inbound::MissingDep { dep: Some(_) }));

    let msg = Inbound::from_frame(&frame("sync", json!({}))).expect("parse");
    assert_eq!(msg, Inbound::Sync);
}

#[test]
fn unknown_event_is_rejected() {
    let err = Inbound::from_frame(&frame("add_marker", json!({}))).expect_err("unknown");
    assert!(matches!(err, MessageError::UnknownEvent(ref e) if e == "add_marker"));
}

#[test]
fn malformed_payload_is_rejected() {
    let err = Inbound::from_frame(&frame("update_root", json!({"fields": 3}))).expect_err("malformed");
    assert!(matches!(err, MessageError::InvalidPayload { event: "update_root", .. }));
}

#[test]
fn events_list_matches_parser() {
    for event in Inbound::EVENTS {
        let result = Inbound::from_frame(&frame(event, json!({})));
        assert!(!matches!(result, Err(MessageError::UnknownEvent(_))), "{event} should be known");
    }
}
