use crate::RelayService;
use crate::room::PeerChannel;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use mirrorlink_core::{PeerId, RoomId};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// How long a closing connection may take to flush its queued messages.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    let room_id = RoomId::from(room_id);

    ws.on_upgrade(move |socket| handle_socket(socket, room_id, service))
}

async fn handle_socket(socket: WebSocket, room_id: RoomId, service: RelayService) {
    let peer_id = PeerId::new();
    info!("New relay connection {} for room {}", peer_id, room_id);

    let (mut sender, mut receiver) = socket.split();
    let (channel, mut rx) = PeerChannel::new(peer_id, room_id.clone());
    let membership = service.registry().enter(channel);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                return;
            }
        }
        let _ = sender.close().await;
    });
    let send_abort = send_task.abort_handle();

    let mut recv_task = tokio::spawn({
        let registry = service.registry().clone();
        let room_id = room_id.clone();

        async move {
            while let Some(frame) = receiver.next().await {
                match frame {
                    Ok(msg @ (Message::Text(_) | Message::Binary(_))) => {
                        let delivered = registry.broadcast(&room_id, &peer_id, msg);
                        debug!(
                            "Relayed message from {} in room {} to {} peer(s)",
                            peer_id, room_id, delivered
                        );
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Relay channel {} failed: {}", peer_id, e);
                        break;
                    }
                }
            }
        }
    });

    let writer_done = tokio::select! {
        _ = &mut recv_task => false,
        _ = &mut send_task => true,
        _ = wait_for_shutdown(service.subscribe_shutdown()) => false,
    };

    recv_task.abort();
    // Leaving drops the registry's sender, so the writer drains and closes.
    drop(membership);
    if !writer_done && tokio::time::timeout(CLOSE_GRACE, send_task).await.is_err() {
        send_abort.abort();
    }

    info!("Relay connection {} left room {}", peer_id, room_id);
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    loop {
        let stop = *rx.borrow_and_update();
        if stop {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
