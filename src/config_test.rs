use std::collections::HashMap;

use super::*;

fn config_from(pairs: &[(&str, &str)]) -> Result<CellConfig, ConfigError> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    CellConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = config_from(&[]).unwrap();
    assert!(cfg.host_url.is_none());
    assert_eq!(cfg.geocoder_url, DEFAULT_GEOCODER_URL);
    assert_eq!(
        cfg.timeouts,
        GeocoderTimeouts { request_secs: DEFAULT_GEOCODER_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg.features, FormFeatures::all());
    assert_eq!(cfg.wire, WireFormat::Json);
}

#[test]
fn reads_every_variable() {
    let cfg = config_from(&[
        ("MAPCELL_HOST_URL", "ws://127.0.0.1:4000/cell"),
        ("MAPCELL_GEOCODER_URL", "http://localhost:8080/"),
        ("MAPCELL_GEOCODER_TIMEOUT_SECS", "3"),
        ("MAPCELL_CONNECT_TIMEOUT_SECS", "1"),
        ("MAPCELL_FEATURES", "query,reorder"),
        ("MAPCELL_WIRE", "protobuf"),
    ])
    .unwrap();
    assert_eq!(cfg.require_host_url().unwrap(), "ws://127.0.0.1:4000/cell");
    assert_eq!(cfg.geocoder_url, "http://localhost:8080");
    assert_eq!(cfg.timeouts, GeocoderTimeouts { request_secs: 3, connect_secs: 1 });
    assert!(cfg.features.query_sources);
    assert!(cfg.features.reorder);
    assert!(!cfg.features.commercial_styles);
    assert_eq!(cfg.wire, WireFormat::Protobuf);
}

#[test]
fn bad_timeouts_fall_back_to_defaults() {
    let cfg = config_from(&[("MAPCELL_GEOCODER_TIMEOUT_SECS", "soon")]).unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_GEOCODER_TIMEOUT_SECS);
}

#[test]
fn empty_host_url_counts_as_missing() {
    let cfg = config_from(&[("MAPCELL_HOST_URL", "")]).unwrap();
    assert_eq!(cfg.require_host_url(), Err(ConfigError::MissingHostUrl));
}

#[test]
fn unknown_feature_is_rejected() {
    let err = config_from(&[("MAPCELL_FEATURES", "teleport")]).unwrap_err();
    assert!(matches!(err, ConfigError::Features(FeatureError::Unknown(ref f)) if f == "teleport"));
}

#[test]
fn unknown_wire_is_rejected() {
    let err = config_from(&[("MAPCELL_WIRE", "xml")]).unwrap_err();
    assert_eq!(err, ConfigError::Wire("xml".into()));
}

#[test]
fn error_codes() {
    use frames::ErrorCode;
    assert_eq!(ConfigError::MissingHostUrl.error_code(), "E_MISSING_HOST_URL");
    assert_eq!(ConfigError::Wire(String::new()).error_code(), "E_INVALID_WIRE");
}
