use form::messages::Outbound;

use super::*;

fn init() -> Value {
    json!({
        "root_fields": {"style": "default", "center": "", "zoom": 0},
        "layers": [{"layer_id": "a", "layer_source": "quakes", "layer_type": "circle"}],
        "source_variables": [{"variable": "quakes", "columns": ["lat", "lng"], "type": "table"}],
        "missing_dep": null
    })
}

#[test]
fn channel_builds_from_init_frame() {
    let channel = build_channel(FormFeatures::all(), init()).unwrap();
    assert_eq!(channel.store().layers().len(), 1);
    assert_eq!(channel.store().source_names(), vec!["quakes"]);
}

#[test]
fn malformed_init_is_rejected() {
    let err = build_channel(FormFeatures::all(), json!({"layers": "none"})).unwrap_err();
    assert!(matches!(err, CellError::InvalidInit(_)));
}

#[test]
fn stdin_lines_drive_the_channel() {
    let mut channel = build_channel(FormFeatures::all(), init()).unwrap();
    assert!(handle_line(&mut channel, r#"{"event": "input", "field": "zoom", "value": "4"}"#).is_empty());
    let effects = handle_line(&mut channel, r#"{"event": "blur", "field": "zoom"}"#);
    assert_eq!(
        effects,
        vec![Effect::Send(Outbound::UpdateField { field: "zoom".into(), value: json!("4"), idx: None, layer_id: None })]
    );
}

#[test]
fn blank_and_bad_lines_do_nothing() {
    let mut channel = build_channel(FormFeatures::all(), init()).unwrap();
    assert!(handle_line(&mut channel, "   ").is_empty());
    assert!(handle_line(&mut channel, "zoom=4").is_empty());
}

#[test]
fn snapshot_lists_layers_with_titles() {
    let channel = build_channel(FormFeatures::all(), init()).unwrap();
    let snap = snapshot(channel.store());
    assert_eq!(snap["layers"][0]["layer_id"], "a");
    assert_eq!(snap["layers"][0]["title"], "Layer 1");
    assert_eq!(snap["layers"][0]["subtitle"], "quakes - circle");
    assert_eq!(snap["root_fields"]["style"], "default");
    assert!(snap["missing_dep"].is_null());
}

#[test]
fn snapshot_flags_selects_that_lost_their_option() {
    let mut data = init();
    data["layers"][0]["source_latitude"] = json!("latitude");
    let channel = build_channel(FormFeatures::basic(), data).unwrap();
    let snap = snapshot(channel.store());
    assert_eq!(snap["layers"][0]["unavailable"], json!(["source_latitude"]));
    assert_eq!(snap["layers"][0]["column_options"], json!(["lat", "lng"]));
    assert_eq!(snap["options"]["layer_source_query_strict"], json!([]));
    assert_eq!(snap["view"]["removable_layers"], false);
}
