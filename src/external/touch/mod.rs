/// Touchscreen input
pub mod evdev;
pub mod interface;
#[cfg(test)]
pub mod mock;

pub use interface::*;
