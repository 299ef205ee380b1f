//! Map-side interaction dispatcher for the map smart cell.
//!
//! The host sends interaction requests (markers, controls, hover and click
//! behaviors, images, camera moves). This crate queues them until the map
//! engine has loaded, then applies them through the [`engine::MapEngine`]
//! capability trait. The engine itself is supplied by the embedder.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`dispatch`] | Request queueing, per-layer behaviors, pointer input routing |
//! | [`request`] | Request types, live-frame parsing, the initial batch |
//! | [`engine`] | Engine trait, controls, markers, features, pointer events |
//! | [`hover`] | Single-feature hover highlighting |
//! | [`geocoder`] | Forward geocoding for the geocoder control |
//! | [`camera`] | Positions, bounds, camera targets |
//! | [`consts`] | Control defaults and well-known keys |

pub mod camera;
pub mod consts;
pub mod dispatch;
pub mod engine;
pub mod geocoder;
pub mod hover;
pub mod request;

/// Flat key-value payload.
pub type Data = serde_json::Map<String, serde_json::Value>;
