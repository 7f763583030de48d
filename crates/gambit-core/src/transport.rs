//! Transport seam and the WebSocket implementation.
//!
//! The engine talks to the server through the object-safe [`Transport`] and
//! [`Connector`] traits, so the lifecycle logic never depends on a concrete
//! wire library. [`WsConnector`] is the production implementation over
//! tokio-tungstenite; [`channel_pair`] provides an in-memory transport for
//! driving the engine in tests without a server.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::{AgentError, Result};

/// A connected duplex text channel to the game server.
#[async_trait]
pub trait Transport: Send {
    /// Send one text payload.
    async fn send(&mut self, payload: &str) -> Result<()>;

    /// Receive the next text payload. `Ok(None)` means the peer closed the
    /// connection cleanly.
    ///
    /// Must be cancel-safe: the engine polls `recv` inside `select!` and may
    /// drop an unresolved call without losing the next message.
    async fn recv(&mut self) -> Result<Option<String>>;

    /// Close the connection. Closing an already-closed transport is not an
    /// error.
    async fn close(&mut self) -> Result<()>;
}

/// Opens [`Transport`]s. The reconnection supervisor calls this once per
/// connection attempt, so implementations must be reusable.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to `url`, failing if it does not complete within
    /// `timeout`.
    async fn connect(&self, url: &str, timeout: Duration) -> Result<Box<dyn Transport>>;
}

// =============================================================================
// WebSocket implementation
// =============================================================================

/// WebSocket connector backed by tokio-tungstenite.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

/// A live WebSocket connection.
pub struct WsTransport {
    inner: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str, timeout: Duration) -> Result<Box<dyn Transport>> {
        match tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url)).await {
            Err(_) => Err(AgentError::ConnectTimeout {
                url: url.to_string(),
                timeout,
            }),
            Ok(Err(e)) => Err(AgentError::connect_failed(url, e.to_string())),
            Ok(Ok((stream, _response))) => Ok(Box::new(WsTransport { inner: stream })),
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, payload: &str) -> Result<()> {
        self.inner
            .send(Message::text(payload))
            .await
            .map_err(|e| AgentError::send_failed(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<String>> {
        loop {
            match self.inner.next().await {
                None => return Ok(None),
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Binary(bytes))) => {
                    return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
                }
                Some(Ok(Message::Close(_))) => return Ok(None),
                // ping/pong handled by tungstenite; raw frames don't surface
                Some(Ok(_)) => continue,
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => return Ok(None),
                Some(Err(e)) => return Err(AgentError::recv_failed(e.to_string())),
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self.inner.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(AgentError::send_failed(e.to_string())),
        }
    }
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// In-memory transport half handed to the agent; see [`channel_pair`].
pub struct ChannelTransport {
    incoming: mpsc::UnboundedReceiver<String>,
    outgoing: mpsc::UnboundedSender<String>,
}

/// Test-side half of an in-memory connection: push server messages with
/// `to_agent`, observe agent responses on `from_agent`. Dropping `to_agent`
/// reads as a clean close to the agent.
pub struct ChannelRemote {
    pub to_agent: mpsc::UnboundedSender<String>,
    pub from_agent: mpsc::UnboundedReceiver<String>,
}

/// Create a connected in-memory transport pair.
pub fn channel_pair() -> (ChannelTransport, ChannelRemote) {
    let (to_agent, incoming) = mpsc::unbounded_channel();
    let (outgoing, from_agent) = mpsc::unbounded_channel();
    (
        ChannelTransport { incoming, outgoing },
        ChannelRemote { to_agent, from_agent },
    )
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&mut self, payload: &str) -> Result<()> {
        self.outgoing
            .send(payload.to_string())
            .map_err(|_| AgentError::send_failed("channel peer dropped"))
    }

    async fn recv(&mut self) -> Result<Option<String>> {
        Ok(self.incoming.recv().await)
    }

    async fn close(&mut self) -> Result<()> {
        self.incoming.close();
        Ok(())
    }
}
