//! Capability flags selected when the form is constructed.
//!
//! Different notebook integrations expose different subsets of the form.
//! Rather than one form per integration, a single form reads these flags and
//! drops events for capabilities that are switched off.

#[cfg(test)]
#[path = "features_test.rs"]
mod features_test;

use crate::consts::{
    BASIC_STYLES, COMMERCIAL_STYLES, COORDINATE_OPTIONS, GEOCODE_TYPE_OPTIONS, QUERY_OPTIONS, TYPE_OPTIONS,
};
use crate::layer::SourceType;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("unknown form feature: {0}")]
    Unknown(String),
}

impl frames::ErrorCode for FeatureError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "E_UNKNOWN_FEATURE",
        }
    }
}

/// Which optional parts of the form are available.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormFeatures {
    /// Commercial styles and the provider key / secret fields.
    pub commercial_styles: bool,
    /// Layers backed by a geocoded place query.
    pub query_sources: bool,
    /// Per-layer on/off switch.
    pub layer_toggle: bool,
    /// Drag-and-drop layer reordering.
    pub reorder: bool,
}

impl Default for FormFeatures {
    fn default() -> Self {
        Self::all()
    }
}

impl FormFeatures {
    #[must_use]
    pub fn all() -> Self {
        Self { commercial_styles: true, query_sources: true, layer_toggle: true, reorder: true }
    }

    /// The plain form: styles, center, zoom, and layers.
    #[must_use]
    pub fn basic() -> Self {
        Self { commercial_styles: false, query_sources: false, layer_toggle: false, reorder: false }
    }

    /// Parse a comma-separated feature list. `all` and `basic` are accepted
    /// as shorthands; an empty list means `basic`.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::Unknown`] for an unrecognized name.
    pub fn parse(raw: &str) -> Result<Self, FeatureError> {
        let mut features = Self::basic();
        for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name {
                "all" => features = Self::all(),
                "basic" => {}
                "commercial" => features.commercial_styles = true,
                "query" => features.query_sources = true,
                "toggle" => features.layer_toggle = true,
                "reorder" => features.reorder = true,
                other => return Err(FeatureError::Unknown(other.to_owned())),
            }
        }
        Ok(features)
    }

    /// Styles offered by the style select.
    #[must_use]
    pub fn style_options(&self) -> Vec<&'static str> {
        let mut styles = BASIC_STYLES.to_vec();
        if self.commercial_styles {
            styles.extend_from_slice(COMMERCIAL_STYLES);
        }
        styles
    }

    /// Layer types offered for a layer with the given source type.
    #[must_use]
    pub fn type_options(&self, source_type: Option<SourceType>) -> &'static [&'static str] {
        if self.query_sources && source_type == Some(SourceType::Query) {
            GEOCODE_TYPE_OPTIONS
        } else {
            TYPE_OPTIONS
        }
    }

    /// Values of the coordinates format select.
    #[must_use]
    pub fn coordinate_formats(&self) -> Vec<&'static str> {
        COORDINATE_OPTIONS.iter().map(|(_, value)| *value).collect()
    }

    /// Strictness levels for query layers. Empty when query sources are off.
    #[must_use]
    pub fn query_options(&self) -> &'static [&'static str] {
        if self.query_sources { QUERY_OPTIONS } else { &[] }
    }

    /// Whether a committed edit to `field` belongs to an enabled capability.
    #[must_use]
    pub fn allows_field(&self, field: &str) -> bool {
        if field.starts_with("maptiler_key") || field == "use_maptiler_key_secret" {
            return self.commercial_styles;
        }
        if field.starts_with("layer_source_query") {
            return self.query_sources;
        }
        if field == "active" {
            return self.layer_toggle;
        }
        true
    }
}
