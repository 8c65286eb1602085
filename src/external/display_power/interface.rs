use tokio::sync::broadcast;

/// A raw display power notification, as delivered by the platform.
///
/// The codes follow the panel notifier convention of announcing both the start
/// and the end of a transition. Sources may also pass through codes this
/// daemon knows nothing about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayNotification(pub u32);

impl DisplayNotification {
    pub const ON_START: DisplayNotification = DisplayNotification(1);
    pub const ON_END: DisplayNotification = DisplayNotification(2);
    pub const OFF_START: DisplayNotification = DisplayNotification(3);
    pub const OFF_END: DisplayNotification = DisplayNotification(4);
}

/// A display power transition the backlight logic reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayPowerEvent {
    /// The display has started turning off
    Off,
    /// The display has finished turning on
    On,
}

impl DisplayPowerEvent {
    /// Maps a raw notification to an event, `None` for everything else.
    pub fn from_notification(notification: DisplayNotification) -> Option<DisplayPowerEvent> {
        match notification {
            DisplayNotification::OFF_START => Some(DisplayPowerEvent::Off),
            DisplayNotification::ON_END => Some(DisplayPowerEvent::On),
            _ => None,
        }
    }
}

/// A source of display power notifications
pub trait DisplayPowerSource: Send {
    /// Subscribe to the notifications. Each call returns an independent receiver.
    fn subscribe(&self) -> broadcast::Receiver<DisplayNotification>;
}
