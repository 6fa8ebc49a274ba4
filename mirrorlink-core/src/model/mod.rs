mod peer;
mod room;
mod session;
mod signaling;

pub use peer::PeerId;
pub use room::RoomId;
pub use session::{MediaDirection, SdpType, SessionDescription};
pub use signaling::SignalMessage;
