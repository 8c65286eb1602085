//! A small actor framework on top of Tokio tasks, used by the daemon's
//! long-lived components (sensors, the settings server, the D-Bus controller).

mod ports;
mod server;

#[doc(inline)]
pub use ports::*;

#[doc(inline)]
pub use server::*;

#[cfg(test)]
mod test_ports;

#[cfg(test)]
mod test_server;
