mod app;
mod config;
mod error;
mod media;
mod negotiation;
mod observer;
mod session;
mod shutdown;
mod transport;

pub use app::*;
pub use config::*;
pub use error::*;
pub use media::*;
pub use negotiation::*;
pub use observer::*;
pub use session::*;
pub use transport::*;
