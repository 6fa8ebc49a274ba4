mod capture;
mod display;
mod frame;

pub use capture::*;
pub use display::*;
pub use frame::*;
