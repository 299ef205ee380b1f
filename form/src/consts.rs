//! Option lists and numeric limits for the form controls.

// ── Camera ──────────────────────────────────────────────────────

/// Lowest zoom level offered by the zoom slider.
pub const MIN_ZOOM: f64 = 0.0;

/// Highest zoom level offered by the zoom slider.
pub const MAX_ZOOM: f64 = 24.0;

// ── Layer styling ───────────────────────────────────────────────

pub const MIN_OPACITY: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;

pub const MIN_RADIUS: f64 = 1.0;
pub const MAX_RADIUS: f64 = 20.0;

/// Cluster colors are an ordered min / mid / max triple.
pub const CLUSTER_COLOR_SLOTS: usize = 3;

// ── Option lists ────────────────────────────────────────────────

/// Styles that need no provider credentials.
pub const BASIC_STYLES: &[&str] = &["default", "street (non-commercial)", "terrain (non-commercial)"];

/// Styles backed by a commercial tile provider.
pub const COMMERCIAL_STYLES: &[&str] = &["street (commercial)", "terrain (commercial)"];

/// Layer types for tabular and geometry sources.
pub const TYPE_OPTIONS: &[&str] = &["circle", "fill", "line", "heatmap", "cluster"];

/// Layer types for geocoded query sources.
pub const GEOCODE_TYPE_OPTIONS: &[&str] = &["fill", "line", "circle"];

/// Strictness levels for a geocoded query source.
pub const QUERY_OPTIONS: &[&str] = &["country", "state", "city", "county", "street"];

/// `(label, value)` pairs for the coordinates format select.
pub const COORDINATE_OPTIONS: &[(&str, &str)] = &[
    ("Two columns", "columns"),
    ("Single: lng, lat", "lng_lat"),
    ("Single: lat, lng", "lat_lng"),
];
