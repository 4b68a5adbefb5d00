//! Event stream subscription: the WebSocket half of §6's external interface.
//!
//! Mirrors `utm_server::state::ServerEvent` structurally (tag + payload) but
//! is defined independently here so the SDK has no compile-time dependency
//! on the server crate — only on the wire shape it publishes.

use anyhow::Result;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use utm_core::{Conflict, Mission, Telemetry};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    AircraftRegistered { aircraft_id: String },
    Telemetry(Telemetry),
    BatteryWarning { aircraft_id: String, battery_percent: f64 },
    Emergency { aircraft_id: String, battery_percent: f64 },
    MissionCreated(Mission),
    MissionAssigned(Mission),
    ConflictDetected(Conflict),
    ConflictResolved { aircraft1_id: String, aircraft2_id: String, action: String },
}

/// A live subscription to the server's `/v1/stream` WebSocket.
pub struct EventStream {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl EventStream {
    /// Connect to a UTM server's event stream.
    pub async fn connect(base_url: &str) -> Result<Self> {
        let ws_url = to_ws_url(base_url)?;
        let (socket, _) = connect_async(ws_url).await?;
        Ok(Self { socket })
    }

    /// Read the next event, or `None` once the server closes the connection.
    pub async fn next_event(&mut self) -> Result<Option<Event>> {
        while let Some(msg) = self.socket.next().await {
            match msg? {
                Message::Text(text) => return Ok(Some(serde_json::from_str(&text)?)),
                Message::Close(_) => return Ok(None),
                _ => continue,
            }
        }
        Ok(None)
    }
}

fn to_ws_url(base_url: &str) -> Result<String> {
    let mut url = reqwest::Url::parse(base_url)?;
    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => other,
    }
    .to_string();
    url.set_scheme(&scheme)
        .map_err(|_| anyhow::anyhow!("invalid base URL scheme"))?;
    url.set_path("/v1/stream");
    Ok(url.to_string())
}
