use super::{DisplayNotification, DisplayPowerSource};
use tokio::sync::broadcast;

/// A mock [DisplayPowerSource], usable for testing
#[derive(Debug, Clone)]
pub struct MockDisplayPower {
    sender: broadcast::Sender<DisplayNotification>,
}

impl MockDisplayPower {
    pub fn new() -> MockDisplayPower {
        let (sender, _) = broadcast::channel(8);
        MockDisplayPower { sender }
    }

    /// Deliver a notification to all subscribers. Returns how many there were.
    pub fn notify(&self, notification: DisplayNotification) -> usize {
        self.sender.send(notification).unwrap_or(0)
    }

    /// Deliver a complete off transition
    pub fn turn_off(&self) {
        self.notify(DisplayNotification::OFF_START);
        self.notify(DisplayNotification::OFF_END);
    }

    /// Deliver a complete on transition
    pub fn turn_on(&self) {
        self.notify(DisplayNotification::ON_START);
        self.notify(DisplayNotification::ON_END);
    }
}

impl Default for MockDisplayPower {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPowerSource for MockDisplayPower {
    fn subscribe(&self) -> broadcast::Receiver<DisplayNotification> {
        self.sender.subscribe()
    }
}
