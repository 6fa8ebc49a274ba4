use crate::room::RoomRegistry;
use crate::signaling::ws_handler;
use axum::Router;
use axum::routing::get;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

struct RelayInner {
    registry: RoomRegistry,
    shutdown_tx: watch::Sender<bool>,
}

/// Signaling relay: owns the room registry and serves `/ws/{room_id}`.
///
/// Cheap to clone; all clones share one registry.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl Default for RelayService {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayService {
    pub fn new() -> Self {
        Self::with_registry(RoomRegistry::new())
    }

    pub fn with_registry(registry: RoomRegistry) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(RelayInner {
                registry,
                shutdown_tx,
            }),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws/{room_id}", get(ws_handler))
            .with_state(self.clone())
    }

    /// Ends every open channel loop. Each loop releases its membership on
    /// the way out.
    pub fn shutdown(&self) {
        self.inner.shutdown_tx.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.inner.shutdown_tx.borrow()
    }

    pub(crate) fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.inner.shutdown_tx.subscribe()
    }

    /// Serves the relay on `listener` until `signal` resolves.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!("Signaling relay listening on ws://{}", addr);
        }

        let service = self.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                signal.await;
                info!("Signaling relay shutting down");
                service.shutdown();
            })
            .await
    }
}
