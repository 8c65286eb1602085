/// Control of the touch-key LED
pub mod interface;
pub mod logind;
#[cfg(test)]
pub mod mock;

pub use interface::*;
