//! Log shipping for mirrorlink processes.
//!
//! Peers and the relay log through `tracing`. When an aggregator address is
//! known, a [`ShippingLayer`] forwards each event as a length-prefixed JSON
//! [`LogRecord`] to the [`Aggregator`], which appends it to one shared file.

mod aggregator;
mod discovery;
mod error;
mod framing;
mod init;
mod record;
mod shipper;

pub use aggregator::*;
pub use discovery::*;
pub use error::*;
pub use framing::*;
pub use init::*;
pub use record::*;
pub use shipper::*;
