use super::*;

#[test]
fn point_response_takes_first_row() {
    let text = serde_json::json!([
        {"place_id": 1, "lat": "48.8588897", "lon": "2.3200410", "display_name": "Paris"},
        {"place_id": 2, "lat": "33.66", "lon": "-95.55", "display_name": "Paris, Texas"}
    ])
    .to_string();
    let place = parse_point_response(&text).unwrap().unwrap();
    assert!((place.lon - 2.320_041).abs() < 1e-9);
    assert!((place.lat - 48.858_889_7).abs() < 1e-9);
}

#[test]
fn empty_point_response_is_none() {
    assert!(parse_point_response("[]").unwrap().is_none());
}

#[test]
fn garbled_coordinates_are_none() {
    let text = r#"[{"lat": "north", "lon": "east"}]"#;
    assert!(parse_point_response(text).unwrap().is_none());
}

#[test]
fn non_json_point_response_is_an_error() {
    let err = parse_point_response("<html>").unwrap_err();
    assert!(matches!(err, GeocodeError::Parse(_)));
}

#[test]
fn places_response_reads_features() {
    let text = serde_json::json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "bbox": [-9.23, 38.69, -9.09, 38.80],
            "properties": {"display_name": "Lisboa, Portugal", "place_id": 9},
            "geometry": {"type": "Polygon", "coordinates": []}
        }]
    })
    .to_string();
    let hits = parse_places_response(&text).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].bbox, Some([-9.23, 38.69, -9.09, 38.80]));
    assert_eq!(hits[0].properties["display_name"], "Lisboa, Portugal");
}

#[test]
fn places_response_without_features_is_empty() {
    assert!(parse_places_response(r#"{"type": "FeatureCollection"}"#).unwrap().is_empty());
}

#[test]
fn client_builds_from_config() {
    let config = CellConfig::from_lookup(|_| None).unwrap();
    let client = NominatimClient::new(&config).unwrap();
    assert_eq!(client.base_url, "https://nominatim.openstreetmap.org");
}
