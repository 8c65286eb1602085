use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use super::{DisplayNotification, DisplayPowerSource};
use anyhow::{anyhow, Context, Result};
use log::{debug, error};
use tokio::sync::broadcast;
use x11rb::{
    connection::RequestConnection,
    protocol::dpms::{self, ConnectionExt as _},
    rust_connection::RustConnection,
};

/// A [DisplayPowerSource] which watches the DPMS power level of an X11 display.
///
/// X11 doesn't send events on DPMS level changes, so the level is polled from
/// a dedicated thread.
#[derive(Debug)]
pub struct X11DisplayPower {
    sender: broadcast::Sender<DisplayNotification>,
    stop_flag: Arc<AtomicBool>,
}

impl X11DisplayPower {
    pub fn new(display_name: Option<&str>, poll_interval: Duration) -> Result<X11DisplayPower> {
        let (connection, _) = RustConnection::connect(display_name)
            .context("Couldn't connect to the X11 display")?;
        if connection
            .extension_information(dpms::X11_EXTENSION_NAME)?
            .is_none()
        {
            return Err(anyhow!("DPMS X11 extension unsupported"));
        }
        let initially_on = is_display_on(&connection)?;
        debug!("Display initially on? {}", initially_on);
        let (sender, _) = broadcast::channel(8);
        let stop_flag = Arc::new(AtomicBool::new(false));
        Self::start_poller(
            connection,
            initially_on,
            poll_interval,
            sender.clone(),
            stop_flag.clone(),
        );
        Ok(X11DisplayPower { sender, stop_flag })
    }

    fn start_poller(
        connection: RustConnection,
        mut was_on: bool,
        poll_interval: Duration,
        sender: broadcast::Sender<DisplayNotification>,
        stop_flag: Arc<AtomicBool>,
    ) {
        std::thread::spawn(move || {
            while !stop_flag.load(Ordering::Acquire) {
                std::thread::sleep(poll_interval);
                let is_on = match is_display_on(&connection) {
                    Ok(is_on) => is_on,
                    Err(e) => {
                        error!("Couldn't fetch DPMS state: {}", e);
                        continue;
                    }
                };
                for notification in transition_notifications(was_on, is_on) {
                    debug!("Display power transition: {:?}", notification);
                    // Having no subscribers at the moment is fine
                    let _ = sender.send(*notification);
                }
                was_on = is_on;
            }
            log::info!("X11 DPMS poller stopped");
        });
    }
}

impl DisplayPowerSource for X11DisplayPower {
    fn subscribe(&self) -> broadcast::Receiver<DisplayNotification> {
        self.sender.subscribe()
    }
}

impl Drop for X11DisplayPower {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Release);
    }
}

/// A display with DPMS disabled never powers down, so it counts as on.
fn is_display_on(connection: &RustConnection) -> Result<bool> {
    let info = connection.dpms_info()?.reply()?;
    Ok(!info.state || info.power_level == dpms::DPMSMode::ON)
}

/// Notifications describing the transition between two polled states
pub(super) fn transition_notifications(
    was_on: bool,
    is_on: bool,
) -> &'static [DisplayNotification] {
    match (was_on, is_on) {
        (true, false) => &[DisplayNotification::OFF_START, DisplayNotification::OFF_END],
        (false, true) => &[DisplayNotification::ON_START, DisplayNotification::ON_END],
        _ => &[],
    }
}
