use std::sync::{Arc, Mutex};

use super::{BacklightSink, LedState};

/// A mock [BacklightSink] which records every command it receives.
#[derive(Debug, Clone, Default)]
pub struct MockBacklightSink {
    commands: Arc<Mutex<Vec<LedState>>>,
}

impl MockBacklightSink {
    pub fn new() -> MockBacklightSink {
        Self::default()
    }

    /// All commands received so far, oldest first
    pub fn commands(&self) -> Vec<LedState> {
        self.commands.lock().unwrap().clone()
    }

    pub fn count(&self, state: LedState) -> usize {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == state)
            .count()
    }

    pub fn last(&self) -> Option<LedState> {
        self.commands.lock().unwrap().last().copied()
    }

    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }
}

impl BacklightSink for MockBacklightSink {
    fn set_backlight(&self, state: LedState) {
        self.commands.lock().unwrap().push(state);
    }
}
