//! Backlight decision logic and the control surface in front of it

pub mod arbiter;
pub mod config_state;
pub mod dbus_controller;
pub mod decay_timer;
pub mod settings_controller;
mod sink_slot;

#[cfg(test)]
mod test;
