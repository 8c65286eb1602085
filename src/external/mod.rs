//! Provides abstractions over the APIs of various system components

pub mod dbus;
pub mod dependency_provider;
pub mod display_power;
pub mod led;
pub mod touch;
