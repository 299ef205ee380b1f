//! Configuration form for the map smart cell.
//!
//! The form is a controlled view of host-confirmed state: user edits never
//! touch the store directly. They become outbound messages, and the store
//! only changes when the host echoes a patch back. Rendering is left to the
//! embedding UI layer, which reads from [`store::FormStore`] and feeds user
//! interaction into [`sync::SyncChannel`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Root fields, layer sequence, source variables, availability |
//! | [`layer`] | Layer records, stable layer ids, typed field accessors |
//! | [`root`] | Map-level fields (style, center, zoom, provider keys) |
//! | [`source`] | Column-bearing data sources offered to layers |
//! | [`messages`] | Tagged inbound/outbound host messages |
//! | [`controls`] | UI events and the focused-control edit buffer |
//! | [`sync`] | The sync channel tying store, controls, and messages together |
//! | [`center`] | Center-field coordinate detection and lookup results |
//! | [`features`] | Capability flags chosen at construction |
//! | [`consts`] | Option lists and numeric limits |

pub mod center;
pub mod consts;
pub mod controls;
pub mod features;
pub mod layer;
pub mod messages;
pub mod root;
pub mod source;
pub mod store;
pub mod sync;

/// Flat key-value payload. Alias to reduce noise in signatures.
pub type Data = serde_json::Map<String, serde_json::Value>;
