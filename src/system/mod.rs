//! Tasks feeding platform events into the arbiter

pub mod display_power_observer;
pub mod touch_sensor;
