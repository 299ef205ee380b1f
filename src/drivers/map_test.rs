use serde_json::json;

use super::*;

fn engine(style: &Value) -> TracingEngine {
    TracingEngine::from_style(style, reqwest::Client::new())
}

#[test]
fn layer_sources_come_from_style_layers() {
    let engine = engine(&json!({
        "layers": [
            {"id": "quakes", "source": "quakes_src", "type": "circle"},
            {"id": "background", "type": "background"}
        ]
    }));
    assert_eq!(engine.layer_source("quakes").as_deref(), Some("quakes_src"));
    assert_eq!(engine.layer_source("background"), None);
    assert_eq!(engine.layer_source("missing"), None);
}

#[test]
fn style_without_layers_has_no_sources() {
    assert_eq!(engine(&json!({})).layer_source("quakes"), None);
    assert_eq!(engine(&json!({"layers": "nope"})).layer_source("quakes"), None);
}

#[tokio::test]
async fn cluster_zoom_is_unavailable_headless() {
    let engine = engine(&json!({"layers": [{"id": "clusters", "source": "pts"}]}));
    assert_eq!(
        engine.cluster_expansion_zoom("other", 1).await,
        Err(EngineError::UnknownSource("other".into()))
    );
    assert!(matches!(
        engine.cluster_expansion_zoom("pts", 4).await,
        Err(EngineError::Cluster { cluster_id: 4, .. })
    ));
}

#[tokio::test]
async fn unreachable_image_url_fails_to_load() {
    let engine = engine(&json!({}));
    let err = engine.load_image("http://127.0.0.1:1/pin.png").await.unwrap_err();
    assert!(matches!(err, EngineError::ImageLoad { ref url, .. } if url == "http://127.0.0.1:1/pin.png"));
}

#[tokio::test]
async fn dispatcher_queues_until_loaded() {
    let payload: MapPayload = serde_json::from_value(json!({
        "spec": {"layers": []},
        "events": {"filters": [{"layer": "quakes", "filter": ["==", "kind", "big"]}]}
    }))
    .unwrap();
    let mut dispatcher = MapDispatcher::new(engine(&payload.spec), payload.events);
    assert_eq!(dispatcher.pending(), 1);
    assert!(dispatcher.on_load().await.is_empty());
    assert!(dispatcher.is_loaded());
    assert_eq!(dispatcher.pending(), 0);
}
