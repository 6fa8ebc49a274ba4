use axum::extract::ws::Message;
use mirrorlink_core::{PeerId, RoomId};
use tokio::sync::mpsc;

/// Outbound half of one connected participant.
///
/// Messages pushed here are drained in order by the connection's writer
/// task. The channel remembers its room so that cleanup can find it.
#[derive(Debug, Clone)]
pub struct PeerChannel {
    peer_id: PeerId,
    room_id: RoomId,
    tx: mpsc::UnboundedSender<Message>,
}

impl PeerChannel {
    pub fn new(peer_id: PeerId, room_id: RoomId) -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = Self {
            peer_id,
            room_id,
            tx,
        };
        (channel, rx)
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Queues a message without waiting. Fails only if the writer is gone.
    pub fn send(&self, msg: Message) -> Result<(), mpsc::error::SendError<Message>> {
        self.tx.send(msg)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
