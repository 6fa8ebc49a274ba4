pub mod error;
pub mod model;
pub mod sdp;

pub use error::ProtocolError;
pub use model::*;
