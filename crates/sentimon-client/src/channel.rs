//! WebSocket push channel client.
//!
//! [`PushChannel`] turns the raw frame stream into lifecycle signals: a
//! decoded message, a malformed frame, a transport error, or a close. The
//! channel is opened once and never reconnected.

use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::ClientError;
use crate::events::ChannelEvent;

/// One observation on the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSignal {
    Message(ChannelEvent),
    /// A frame arrived but was not a valid envelope.
    Malformed(String),
    Error(String),
    Closed,
}

pub struct PushChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
}

impl std::fmt::Debug for PushChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushChannel").field("url", &self.url).finish()
    }
}

impl PushChannel {
    /// Performs the WebSocket handshake against `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] if the URL is invalid, the TCP
    /// connection fails, or the handshake is rejected.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, response) = connect_async(url).await?;
        tracing::debug!(url, status = %response.status(), "push channel handshake complete");
        Ok(Self {
            stream,
            url: url.to_string(),
        })
    }

    /// Waits for the next lifecycle signal.
    ///
    /// Control frames (ping, pong) are consumed silently. After
    /// [`ChannelSignal::Closed`] or [`ChannelSignal::Error`] the channel
    /// should not be polled again.
    pub async fn next_signal(&mut self) -> ChannelSignal {
        loop {
            let Some(frame) = self.stream.next().await else {
                return ChannelSignal::Closed;
            };
            match frame {
                Ok(Message::Text(text)) => {
                    return match ChannelEvent::decode(text.as_str()) {
                        Ok(event) => ChannelSignal::Message(event),
                        Err(e) => ChannelSignal::Malformed(e.to_string()),
                    };
                }
                Ok(Message::Binary(bytes)) => {
                    return ChannelSignal::Malformed(format!(
                        "unexpected binary frame ({} bytes)",
                        bytes.len()
                    ));
                }
                Ok(Message::Close(_)) => return ChannelSignal::Closed,
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    return ChannelSignal::Closed;
                }
                Err(e) => return ChannelSignal::Error(e.to_string()),
            }
        }
    }

    /// Sends a close frame and flushes it. Closing an already closed channel
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] if the close frame cannot be written.
    pub async fn close(mut self) -> Result<(), ClientError> {
        tracing::debug!(url = %self.url, "closing push channel");
        match self.stream.close(None).await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
