/// Observation of the display's power state
pub mod interface;
#[cfg(test)]
pub mod mock;
pub mod x11;

pub use interface::*;
