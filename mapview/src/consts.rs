//! Shared constants for the map dispatcher.

// ── Geolocate control ───────────────────────────────────────────

/// Never reuse a cached position.
pub const GEOLOCATE_MAXIMUM_AGE_MS: u64 = 0;

/// Give up on a position fix after this long.
pub const GEOLOCATE_TIMEOUT_MS: u64 = 6000;

// ── Cursor ──────────────────────────────────────────────────────

/// Cursor over a layer that reacts to clicks.
pub const CURSOR_POINTER: &str = "pointer";

/// Engine default cursor.
pub const CURSOR_DEFAULT: &str = "";

// ── Feature state / properties ──────────────────────────────────

/// Feature-state key toggled by hover tracking.
pub const HOVER_STATE: &str = "hover";

/// Property carrying the cluster id on clustered point features.
pub const CLUSTER_ID_PROPERTY: &str = "cluster_id";

// ── Geocoder ────────────────────────────────────────────────────

/// `place_type` assigned to forward-geocoded features.
pub const GEOCODED_PLACE_TYPE: &str = "place";
