//! Forwards display power transitions to the [Arbiter]

use tokio::sync::broadcast;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    StreamExt,
};

use crate::{
    armaf::{Handle, HandleChild},
    control::arbiter::Arbiter,
    external::display_power::{DisplayNotification, DisplayPowerEvent, DisplayPowerSource},
};

pub struct DisplayPowerObserver {
    notifications: broadcast::Receiver<DisplayNotification>,
    arbiter: Arbiter,
}

impl DisplayPowerObserver {
    /// Subscribes to `source` right away, so no notification sent after this
    /// call is missed.
    pub fn new(source: &dyn DisplayPowerSource, arbiter: Arbiter) -> DisplayPowerObserver {
        DisplayPowerObserver {
            notifications: source.subscribe(),
            arbiter,
        }
    }

    pub fn spawn(self) -> Handle {
        let (handle, handle_child) = Handle::new();
        tokio::spawn(async move {
            self.main_loop(handle_child).await;
        });
        handle
    }

    async fn main_loop(self, mut handle_child: HandleChild) {
        let mut notifications = BroadcastStream::new(self.notifications);
        loop {
            tokio::select! {
                _ = handle_child.should_terminate() => {
                    log::info!("Terminating DisplayPowerObserver");
                    return;
                }
                received = notifications.next() => match received {
                    Some(Ok(notification)) => {
                        match DisplayPowerEvent::from_notification(notification) {
                            Some(event) => {
                                log::debug!("Display power event {:?}", event);
                                self.arbiter.on_display_event(event);
                            }
                            None => log::trace!("Ignoring display notification {:?}", notification),
                        }
                    }
                    Some(Err(BroadcastStreamRecvError::Lagged(missed))) => {
                        log::warn!("Missed {} display power notifications", missed);
                    }
                    None => {
                        log::info!("Display power source closed, terminating DisplayPowerObserver");
                        return;
                    }
                }
            }
        }
    }
}
