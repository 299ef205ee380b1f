//! Errors that end a driver session.

use crate::config::ConfigError;
use crate::services::geocode::GeocodeError;

#[derive(Debug, thiserror::Error)]
pub enum CellError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("websocket failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("frame codec failed: {0}")]
    Codec(#[from] frames::CodecError),
    #[error("invalid init payload: {0}")]
    InvalidInit(#[source] serde_json::Error),
    #[error("geocoder unavailable: {0}")]
    Geocoder(#[from] GeocodeError),
    #[error("stdin failed: {0}")]
    Io(#[from] std::io::Error),
}

impl frames::ErrorCode for CellError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::WsConnect(_) => "E_WS_CONNECT",
            Self::WsClosed => "E_WS_CLOSED",
            Self::Codec(_) => "E_CODEC",
            Self::InvalidInit(_) => "E_INVALID_INIT",
            Self::Geocoder(e) => e.error_code(),
            Self::Io(_) => "E_IO",
        }
    }
}
