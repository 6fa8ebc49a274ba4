use crate::room::{PeerChannel, Room};
use axum::extract::ws::Message;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use mirrorlink_core::{PeerId, RoomId};
use std::sync::Arc;
use tracing::{debug, info};

/// Maps room identifiers to their current members.
///
/// Every mutation of a room happens under that room's map entry lock, so
/// concurrent `join`/`leave`/`broadcast` on one room are applied one at a
/// time. A room exists only while it has at least one member.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<DashMap<RoomId, Room>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `channel` to `room_id`, creating the room if needed. Returns the
    /// member count after the insert.
    pub fn join(&self, room_id: &RoomId, channel: PeerChannel) -> usize {
        let peer_id = channel.peer_id();
        let mut room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            Room::default()
        });
        room.insert(channel);

        let members = room.len();
        debug!("Peer {} joined room {} ({} members)", peer_id, room_id, members);
        members
    }

    /// Removes a member. Deletes the room once it is empty. Unknown rooms or
    /// peers are ignored; returns whether anything was removed.
    pub fn leave(&self, room_id: &RoomId, peer_id: &PeerId) -> bool {
        let Entry::Occupied(mut entry) = self.rooms.entry(room_id.clone()) else {
            return false;
        };

        let removed = entry.get_mut().remove(peer_id).is_some();
        let remaining = entry.get().len();
        if remaining == 0 {
            entry.remove();
            info!("Room {} is empty, removing it", room_id);
        } else if removed {
            debug!("Peer {} left room {} ({} members)", peer_id, room_id, remaining);
        }
        removed
    }

    /// Fire-and-forget delivery of `msg` to every member of the room except
    /// `sender`. Returns the number of members it was queued for.
    pub fn broadcast(&self, room_id: &RoomId, sender: &PeerId, msg: Message) -> usize {
        match self.rooms.get(room_id) {
            Some(room) => room.broadcast_from(sender, &msg),
            None => 0,
        }
    }

    /// Joins and returns a guard that leaves again when dropped.
    pub fn enter(&self, channel: PeerChannel) -> Membership {
        let room_id = channel.room_id().clone();
        let peer_id = channel.peer_id();
        self.join(&room_id, channel);

        Membership {
            registry: self.clone(),
            room_id,
            peer_id,
        }
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<PeerId> {
        self.rooms
            .get(room_id)
            .map(|room| room.peer_ids())
            .unwrap_or_default()
    }

    pub fn member_count(&self, room_id: &RoomId) -> usize {
        self.rooms.get(room_id).map(|room| room.len()).unwrap_or(0)
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

/// Registry membership of one connection. Dropping it leaves the room,
/// whichever way the connection ended.
pub struct Membership {
    registry: RoomRegistry,
    room_id: RoomId,
    peer_id: PeerId,
}

impl Membership {
    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        self.registry.leave(&self.room_id, &self.peer_id);
    }
}
