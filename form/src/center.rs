//! Center-field text handling.
//!
//! The center input accepts either a `"lng, lat"` pair or a free-text place
//! name. A pair is forwarded to the host as typed; a place name is resolved
//! through an external lookup first (see [`crate::sync`]).

#[cfg(test)]
#[path = "center_test.rs"]
mod center_test;

use std::sync::LazyLock;

use regex::Regex;

/// Root field holding the map center.
pub const CENTER_FIELD: &str = "center";

static COORDINATE_PAIR: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"(-?\d+\.?\d*),\s*(-?\d+\.?\d*)") {
        Ok(re) => Some(re),
        Err(_) => None,
    });

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Center {
    pub lng: f64,
    pub lat: f64,
}

/// A lookup result for a free-text place name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub lon: f64,
    pub lat: f64,
}

/// Find the first numeric `"a, b"` pair anywhere in `text`.
#[must_use]
pub fn coordinate_pair(text: &str) -> Option<Center> {
    let re = COORDINATE_PAIR.as_ref()?;
    let caps = re.captures(text)?;
    let lng = caps.get(1)?.as_str().parse::<f64>();
    let lat = caps.get(2)?.as_str().parse::<f64>();
    match (lng, lat) {
        (Ok(lng), Ok(lat)) => Some(Center { lng, lat }),
        _ => None,
    }
}

/// Whether committing `text` requires a place lookup before it can be sent.
/// Empty text and coordinate pairs are forwarded as is.
#[must_use]
pub fn needs_lookup(text: &str) -> bool {
    !text.is_empty() && coordinate_pair(text).is_none()
}

/// Render a lookup result the way the center field stores it.
#[must_use]
pub fn format_place(place: Place) -> String {
    format!("{}, {}", place.lon, place.lat)
}
