mod negotiation_state;
mod negotiator;
mod signaling_output;

pub use negotiation_state::*;
pub use negotiator::*;
pub use signaling_output::*;
