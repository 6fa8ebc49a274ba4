use crate::room::PeerChannel;
use axum::extract::ws::Message;
use mirrorlink_core::PeerId;
use std::collections::HashMap;
use tracing::warn;

/// Member set of one room.
#[derive(Debug, Default)]
pub struct Room {
    members: HashMap<PeerId, PeerChannel>,
}

impl Room {
    pub fn insert(&mut self, channel: PeerChannel) {
        self.members.insert(channel.peer_id(), channel);
    }

    pub fn remove(&mut self, peer_id: &PeerId) -> Option<PeerChannel> {
        self.members.remove(peer_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.members.contains_key(peer_id)
    }

    pub fn peer_ids(&self) -> Vec<PeerId> {
        self.members.keys().copied().collect()
    }

    /// Hands `msg` to every member except `sender`.
    ///
    /// A member whose writer has gone away is skipped; delivery to the
    /// others continues. Returns how many members accepted the message.
    pub fn broadcast_from(&self, sender: &PeerId, msg: &Message) -> usize {
        let mut delivered = 0;
        for (peer_id, channel) in &self.members {
            if peer_id == sender {
                continue;
            }
            match channel.send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => warn!(
                    "Dropping message for {} in room {}: writer closed",
                    peer_id,
                    channel.room_id()
                ),
            }
        }
        delivered
    }
}
