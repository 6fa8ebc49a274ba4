
pub use aggregator_helpers::*;
