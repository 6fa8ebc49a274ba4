use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::relay_helpers::MESSAGE_TIMEOUT_MS;

/// Minimal relay participant speaking raw WebSocket frames.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {url}"))?;
        Ok(Self { ws })
    }

    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.ws
            .send(Message::text(text))
            .await
            .context("Failed to send text frame")
    }

    pub async fn send_binary(&mut self, data: &[u8]) -> Result<()> {
        self.ws
            .send(Message::binary(data.to_vec()))
            .await
            .context("Failed to send binary frame")
    }

    /// Next text or binary frame, skipping control frames.
    pub async fn recv(&mut self) -> Result<Message> {
        let timeout = Duration::from_millis(MESSAGE_TIMEOUT_MS);
        loop {
            let frame = tokio::time::timeout(timeout, self.ws.next())
                .await
                .context("Timeout waiting for relayed message")?
                .context("Relay closed the channel")?
                .context("Relay channel error")?;

            match frame {
                Message::Text(_) | Message::Binary(_) | Message::Close(_) => return Ok(frame),
                _ => continue,
            }
        }
    }

    pub async fn recv_text(&mut self) -> Result<String> {
        match self.recv().await? {
            Message::Text(text) => Ok(text.as_str().to_owned()),
            other => anyhow::bail!("Expected text frame, got {:?}", other),
        }
    }

    /// Succeeds if nothing but control frames arrive within `ms`.
    pub async fn expect_silence(&mut self, ms: u64) -> Result<()> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(ms);
        loop {
            match tokio::time::timeout_at(deadline, self.ws.next()).await {
                Err(_) => return Ok(()),
                Ok(Some(Ok(Message::Text(t)))) => anyhow::bail!("Unexpected text: {}", t),
                Ok(Some(Ok(Message::Binary(b)))) => {
                    anyhow::bail!("Unexpected binary: {} bytes", b.len())
                }
                Ok(Some(Ok(_))) => continue,
                Ok(Some(Err(e))) => anyhow::bail!("Channel error: {}", e),
                Ok(None) => anyhow::bail!("Channel closed"),
            }
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await.context("Failed to close")?;
        Ok(())
    }
}
