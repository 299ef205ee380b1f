use serde_json::json;

use super::*;
use crate::Data;

fn center() -> ControlId {
    ControlId::root("center")
}

#[test]
fn default_has_nothing_focused() {
    let state = ControlState::default();
    assert!(state.focused().is_none());
    assert!(state.pending().is_none());
}

#[test]
fn input_focuses_and_buffers() {
    let mut state = ControlState::default();
    state.input(center(), json!("Par"));
    assert_eq!(state.focused(), Some(&center()));
    assert_eq!(state.pending(), Some(&json!("Par")));
}

#[test]
fn focusing_another_control_drops_pending() {
    let mut state = ControlState::default();
    state.input(center(), json!("Par"));
    state.focus(ControlId::root("zoom"));
    assert!(state.pending().is_none());
}

#[test]
fn refocusing_same_control_keeps_pending() {
    let mut state = ControlState::default();
    state.input(center(), json!("Par"));
    state.focus(center());
    assert_eq!(state.pending(), Some(&json!("Par")));
}

#[test]
fn take_pending_only_for_focused_control() {
    let mut state = ControlState::default();
    state.input(center(), json!("Paris"));
    assert!(state.take_pending(&ControlId::root("zoom")).is_none());
    assert_eq!(state.take_pending(&center()), Some(json!("Paris")));
    assert!(state.take_pending(&center()).is_none());
    assert_eq!(state.focused(), Some(&center()));
}

#[test]
fn blur_clears_focus() {
    let mut state = ControlState::default();
    state.input(center(), json!("x"));
    state.blur(&center());
    assert!(state.focused().is_none());
    assert!(state.pending().is_none());
}

#[test]
fn host_patch_on_focused_field_discards_pending() {
    let mut state = ControlState::default();
    state.input(center(), json!("Lis"));
    let mut patch = Data::new();
    patch.insert("zoom".into(), json!(2));
    state.discard_if_touched(None, &patch);
    assert!(state.pending().is_some());

    patch.insert("center".into(), json!("1, 2"));
    state.discard_if_touched(None, &patch);
    assert!(state.pending().is_none());
}

#[test]
fn layer_patch_only_touches_matching_layer() {
    let id = LayerId::from("a");
    let mut state = ControlState::default();
    state.input(ControlId::layer("layer_color", id.clone()), json!("#fff"));

    let mut patch = Data::new();
    patch.insert("layer_color".into(), json!("#000"));
    state.discard_if_touched(Some(&LayerId::from("b")), &patch);
    assert!(state.pending().is_some());
    state.discard_if_touched(Some(&id), &patch);
    assert!(state.pending().is_none());
}

#[test]
fn retain_layers_drops_focus_on_removed_layer() {
    let mut state = ControlState::default();
    state.focus(ControlId::layer("layer_color", LayerId::from("gone")));
    state.retain_layers(|id| id.as_str() != "gone");
    assert!(state.focused().is_none());
}

#[test]
fn retain_layers_keeps_root_focus() {
    let mut state = ControlState::default();
    state.focus(center());
    state.retain_layers(|_| false);
    assert_eq!(state.focused(), Some(&center()));
}
