use serde_json::json;

use super::*;

fn frame(event: &str, data: Value) -> Frame {
    Frame::new(event, data)
}

#[test]
fn add_markers_expands() {
    let requests = InteractionRequest::from_frame(&frame(
        "add_markers",
        json!([{"location": [1.0, 2.0]}, {"location": [3.0, 4.0], "options": {"color": "red"}}]),
    ))
    .expect("parse");
    assert_eq!(requests.len(), 2);
    assert!(matches!(&requests[1], InteractionRequest::AddMarker(m) if m.options["color"] == "red"));
}

#[test]
fn layer_events_take_bare_or_keyed_names() {
    let bare = InteractionRequest::from_frame(&frame("add_hover", json!("quakes"))).expect("bare");
    let keyed = InteractionRequest::from_frame(&frame("add_hover", json!({"layer": "quakes"}))).expect("keyed");
    assert_eq!(bare, keyed);
    assert_eq!(bare, vec![InteractionRequest::AddHover { layer: "quakes".into() }]);
}

#[test]
fn nav_controls_position_is_optional() {
    let requests =
        InteractionRequest::from_frame(&frame("add_nav_controls", json!({"options": {}}))).expect("parse");
    assert!(matches!(&requests[0], InteractionRequest::AddNavControls(NavControls { position: None, .. })));
}

#[test]
fn jump_to_keeps_options() {
    let requests = InteractionRequest::from_frame(&frame(
        "jump_to",
        json!({"location": [-9.1, 38.7], "options": {"zoom": 10, "duration": 300}}),
    ))
    .expect("parse");
    let InteractionRequest::JumpTo(jump) = &requests[0] else {
        panic!("expected JumpTo");
    };
    assert_eq!(jump.location, LngLat::new(-9.1, 38.7));
    assert_eq!(jump.options.get("duration"), Some(&json!(300)));
}

#[test]
fn controls_without_payload_parse() {
    for event in ["add_terrain", "add_geocode", "add_fullscreen"] {
        let requests = InteractionRequest::from_frame(&frame(event, json!({}))).expect("parse");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].kind(), event);
    }
}

#[test]
fn unknown_event_is_rejected() {
    let err = InteractionRequest::from_frame(&frame("spin_globe", json!({}))).expect_err("unknown");
    assert!(matches!(err, RequestError::UnknownEvent(ref e) if e == "spin_globe"));
}

#[test]
fn malformed_payload_is_rejected() {
    let err = InteractionRequest::from_frame(&frame("jump_to", json!({"location": "here"}))).expect_err("bad");
    assert!(matches!(err, RequestError::InvalidPayload { event: "jump_to", .. }));
}

#[test]
fn initial_events_default_to_empty() {
    let payload: MapPayload = serde_json::from_value(json!({"spec": {"version": 8}})).expect("payload");
    assert!(payload.events.into_requests().is_empty());
}

#[test]
fn initial_events_flatten_in_group_order() {
    let events: InitialEvents = serde_json::from_value(json!({
        "filters": [{"layer": "a", "filter": ["==", "x", 1]}],
        "markers": [{"location": [0.0, 0.0]}],
        "hover": ["a"],
        "terrain": [{}],
        "controls": [{"position": "top-left"}],
        "fit_bounds": [{"bounds": [[0.0, 0.0], [1.0, 1.0]]}],
    }))
    .expect("events");
    let kinds: Vec<_> = events.into_requests().iter().map(InteractionRequest::kind).collect();
    assert_eq!(kinds, ["add_marker", "add_nav_controls", "add_terrain", "add_hover", "fit_bounds", "set_filter"]);
}

#[test]
fn live_kinds_round_trip_through_events() {
    for event in InteractionRequest::EVENTS {
        let result = InteractionRequest::from_frame(&frame(event, json!({})));
        assert!(!matches!(result, Err(RequestError::UnknownEvent(_))), "{event} should be known");
    }
}
