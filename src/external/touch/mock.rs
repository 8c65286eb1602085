use super::{TouchEvent, TouchInput};
use tokio::sync::broadcast;

/// A mock [TouchInput], usable for testing
#[derive(Debug, Clone)]
pub struct MockTouchInput {
    sender: broadcast::Sender<TouchEvent>,
}

impl MockTouchInput {
    pub fn new() -> MockTouchInput {
        let (sender, _) = broadcast::channel(16);
        MockTouchInput { sender }
    }

    /// Simulate a touch sample at the given coordinates
    pub fn touch(&self, x: i32, y: i32) -> usize {
        self.sender.send(TouchEvent::new(x, y)).unwrap_or(0)
    }
}

impl Default for MockTouchInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchInput for MockTouchInput {
    fn subscribe(&self) -> broadcast::Receiver<TouchEvent> {
        self.sender.subscribe()
    }
}
