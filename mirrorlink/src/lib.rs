pub use mirrorlink_core::{PeerId, RoomId, SessionDescription, SignalMessage};

pub mod model {
    pub use mirrorlink_core::model::*;
}

pub mod sdp {
    pub use mirrorlink_core::sdp::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use mirrorlink_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use mirrorlink_client::*;
}

#[cfg(feature = "logging")]
pub mod logging {
    pub use mirrorlink_logging::*;
}
