mod peer_channel;
mod room;
mod room_registry;

pub use peer_channel::*;
pub use room::*;
pub use room_registry::*;
