use anyhow::{Context, Result};
use mirrorlink_core::RoomId;
use mirrorlink_server::RelayService;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Timeout for sessions to reach the expected state (ms).
pub const SESSION_TIMEOUT_MS: u64 = 5000;

pub struct TestRelay {
    pub service: RelayService,
    pub addr: SocketAddr,
    stop_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestRelay {
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind relay listener")?;
        let addr = listener.local_addr()?;
        let service = RelayService::new();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(service.clone().serve(listener, async move {
            let _ = stop_rx.await;
        }));

        Ok(Self {
            service,
            addr,
            stop_tx: Some(stop_tx),
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub async fn wait_for_members(&self, room: &str, count: usize) -> Result<()> {
        let room_id = RoomId::from(room);
        wait_until(|| self.service.registry().member_count(&room_id) == count)
            .await
            .with_context(|| format!("Room {room} never reached {count} members"))
    }

    pub async fn stop(mut self) -> Result<()> {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .context("Relay did not stop in time")???;
        Ok(())
    }
}

/// Polls `condition` until it holds or [`SESSION_TIMEOUT_MS`] passes.
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> Result<()> {
    let deadline = Instant::now() + Duration::from_millis(SESSION_TIMEOUT_MS);
    while !condition() {
        if Instant::now() > deadline {
            anyhow::bail!("Timed out after {} ms", SESSION_TIMEOUT_MS);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    Ok(())
}
