//! Cell configuration parsed from environment variables.

use form::features::{FeatureError, FormFeatures};

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("host URL missing; pass --host-url or set MAPCELL_HOST_URL")]
    MissingHostUrl,
    #[error("invalid MAPCELL_FEATURES: {0}")]
    Features(#[from] FeatureError),
    #[error("unsupported MAPCELL_WIRE '{0}' (expected 'json' or 'protobuf')")]
    Wire(String),
}

impl frames::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingHostUrl => "E_MISSING_HOST_URL",
            Self::Features(_) => "E_INVALID_FEATURES",
            Self::Wire(_) => "E_INVALID_WIRE",
        }
    }
}

/// Encoding used for frames sent to the host. Inbound frames are accepted in
/// either encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    #[default]
    Json,
    Protobuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeocoderTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellConfig {
    pub host_url: Option<String>,
    pub geocoder_url: String,
    pub timeouts: GeocoderTimeouts,
    pub features: FormFeatures,
    pub wire: WireFormat,
}

impl CellConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `MAPCELL_HOST_URL`: WebSocket URL of the host (may come from the CLI instead)
    /// - `MAPCELL_GEOCODER_URL`: default Nominatim public instance
    /// - `MAPCELL_GEOCODER_TIMEOUT_SECS`: default 10
    /// - `MAPCELL_CONNECT_TIMEOUT_SECS`: default 5
    /// - `MAPCELL_FEATURES`: comma list, default `all`
    /// - `MAPCELL_WIRE`: `json` (default) or `protobuf`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CellConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host_url = var("MAPCELL_HOST_URL").filter(|url| !url.is_empty());
        let geocoder_url = var("MAPCELL_GEOCODER_URL")
            .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let timeouts = GeocoderTimeouts {
            request_secs: parse_u64(var("MAPCELL_GEOCODER_TIMEOUT_SECS"), DEFAULT_GEOCODER_TIMEOUT_SECS),
            connect_secs: parse_u64(var("MAPCELL_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let features = match var("MAPCELL_FEATURES") {
            Some(raw) => FormFeatures::parse(&raw)?,
            None => FormFeatures::all(),
        };
        let wire = parse_wire(var("MAPCELL_WIRE").as_deref())?;

        Ok(Self { host_url, geocoder_url, timeouts, features, wire })
    }

    /// The host URL, required by both drivers.
    pub fn require_host_url(&self) -> Result<&str, ConfigError> {
        self.host_url.as_deref().ok_or(ConfigError::MissingHostUrl)
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).unwrap_or(default)
}

fn parse_wire(raw: Option<&str>) -> Result<WireFormat, ConfigError> {
    match raw.unwrap_or("json") {
        "json" => Ok(WireFormat::Json),
        "protobuf" => Ok(WireFormat::Protobuf),
        other => Err(ConfigError::Wire(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
