use tokio::sync::broadcast;

/// A touch sample of the first finger, in touchscreen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TouchEvent {
    pub x: i32,
    pub y: i32,
}

impl TouchEvent {
    pub fn new(x: i32, y: i32) -> TouchEvent {
        TouchEvent { x, y }
    }
}

/// A source of touch samples
pub trait TouchInput: Send {
    /// Subscribe to the samples. Each call returns an independent receiver.
    fn subscribe(&self) -> broadcast::Receiver<TouchEvent>;
}
