use serde_json::json;

use super::*;

#[test]
fn root_input_has_no_layer() {
    let input = parse_form_line(r#"{"event": "input", "field": "center", "value": "Paris"}"#).unwrap();
    assert_eq!(
        input,
        FormInput::Ui(UiEvent::Input { control: ControlId::root("center"), value: json!("Paris") })
    );
}

#[test]
fn layer_change_carries_layer_id() {
    let input =
        parse_form_line(r##"{"event": "change", "field": "layer_color", "layer": "a", "value": "#fff"}"##).unwrap();
    assert_eq!(
        input,
        FormInput::Ui(UiEvent::Change {
            control: ControlId::layer("layer_color", LayerId::from("a")),
            value: json!("#fff"),
        })
    );
}

#[test]
fn layer_list_commands() {
    assert_eq!(parse_form_line(r#"{"event": "add_layer"}"#).unwrap(), FormInput::Ui(UiEvent::AddLayer));
    assert_eq!(
        parse_form_line(r#"{"event": "remove_layer", "layer": "b"}"#).unwrap(),
        FormInput::Ui(UiEvent::RemoveLayer(LayerId::from("b")))
    );
    assert_eq!(
        parse_form_line(r#"{"event": "drop", "removed_index": 0, "added_index": 2}"#).unwrap(),
        FormInput::Ui(UiEvent::Drop { removed_index: 0, added_index: 2 })
    );
}

#[test]
fn secret_and_show() {
    assert_eq!(
        parse_form_line(r#"{"event": "secret", "field": "maptiler_key_secret", "secret": "MT"}"#).unwrap(),
        FormInput::Ui(UiEvent::SecretSelected { field: "maptiler_key_secret".into(), secret: "MT".into() })
    );
    assert_eq!(parse_form_line(r#"{"event": "show"}"#).unwrap(), FormInput::Show);
}

#[test]
fn unknown_form_command_is_an_error() {
    assert!(parse_form_line(r#"{"event": "dance"}"#).is_err());
    assert!(parse_form_line("focus center").is_err());
}

#[test]
fn map_click_parses_features() {
    let input = parse_map_line(
        r#"{"event": "click", "layer": "clusters", "point": {"x": 4, "y": 5}, "lng_lat": [1.0, 2.0],
            "features": [{"id": 3, "coordinates": [1.0, 2.0], "properties": {"cluster_id": 8}}]}"#,
    )
    .unwrap();
    let MapInput::Event(MapEvent::Click { layer, point, features, .. }) = input else {
        panic!("expected click");
    };
    assert_eq!(layer, "clusters");
    assert_eq!(point, Point::new(4.0, 5.0));
    assert_eq!(features[0].properties["cluster_id"], 8);
}

#[test]
fn map_loaded_and_search() {
    assert_eq!(parse_map_line(r#"{"event": "loaded"}"#).unwrap(), MapInput::Loaded);
    assert_eq!(
        parse_map_line(r#"{"event": "search", "query": "Lisbon"}"#).unwrap(),
        MapInput::Search("Lisbon".into())
    );
}

#[test]
fn map_hover_events() {
    assert_eq!(
        parse_map_line(r#"{"event": "mouse_leave", "layer": "q"}"#).unwrap(),
        MapInput::Event(MapEvent::MouseLeave { layer: "q".into() })
    );
    let MapInput::Event(MapEvent::MouseMove { features, .. }) =
        parse_map_line(r#"{"event": "mouse_move", "layer": "q", "features": [{"id": 7}]}"#).unwrap()
    else {
        panic!("expected mouse_move");
    };
    assert_eq!(features.len(), 1);
}
