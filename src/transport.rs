//! WebSocket connection to the host.
//!
//! Frames go out in the configured [`WireFormat`]. Inbound frames are
//! decoded by message type: text frames as JSON, binary frames as protobuf.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use frames::Frame;

use crate::config::WireFormat;
use crate::error::CellError;

type Stream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct HostConnection {
    stream: Stream,
    wire: WireFormat,
    cell_id: String,
}

impl HostConnection {
    pub async fn connect(url: &str, wire: WireFormat, cell_id: String) -> Result<Self, CellError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| CellError::WsConnect(Box::new(e)))?;
        tracing::info!(url, %cell_id, "connected to host");
        Ok(Self { stream, wire, cell_id })
    }

    pub async fn send(&mut self, frame: Frame) -> Result<(), CellError> {
        let frame = frame.with_cell_id(self.cell_id.clone());
        tracing::debug!(event = %frame.event, "-> host");
        let message = encode(&frame, self.wire)?;
        self.stream
            .send(message)
            .await
            .map_err(|e| CellError::WsConnect(Box::new(e)))
    }

    /// Next frame from the host. `Ok(None)` once the host closes.
    pub async fn recv(&mut self) -> Result<Option<Frame>, CellError> {
        loop {
            let Some(message) = self.stream.next().await else {
                return Ok(None);
            };
            let message = message.map_err(|e| CellError::WsConnect(Box::new(e)))?;
            match decode(message)? {
                Decoded::Frame(frame) => {
                    tracing::debug!(event = %frame.event, "<- host");
                    return Ok(Some(frame));
                }
                Decoded::Closed => return Ok(None),
                Decoded::Skip => {}
            }
        }
    }

    /// Wait for the session-start frame named `event`. Other frames that
    /// arrive first are logged and dropped.
    pub async fn wait_for(&mut self, event: &str) -> Result<Frame, CellError> {
        loop {
            let Some(frame) = self.recv().await? else {
                return Err(CellError::WsClosed);
            };
            if frame.event == event {
                return Ok(frame);
            }
            tracing::warn!(expected = event, got = %frame.event, "dropping frame before session start");
        }
    }
}

#[derive(Debug)]
pub(crate) enum Decoded {
    Frame(Frame),
    Closed,
    Skip,
}

pub(crate) fn encode(frame: &Frame, wire: WireFormat) -> Result<Message, CellError> {
    Ok(match wire {
        WireFormat::Json => Message::Text(frames::to_json(frame)?.into()),
        WireFormat::Protobuf => Message::Binary(frames::encode_frame(frame).into()),
    })
}

pub(crate) fn decode(message: Message) -> Result<Decoded, CellError> {
    Ok(match message {
        Message::Text(text) => Decoded::Frame(frames::from_json(text.as_str())?),
        Message::Binary(bytes) => Decoded::Frame(frames::decode_frame(&bytes)?),
        Message::Close(_) => Decoded::Closed,
        Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Decoded::Skip,
    })
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
