use std::sync::{Arc, PoisonError, RwLock};

use crate::external::led::{BacklightSink, LedState};

/// Holds the backlight sink, which only becomes available some time after
/// startup.
///
/// Commands sent while nothing is bound are dropped.
#[derive(Default)]
pub struct SinkSlot {
    sink: RwLock<Option<Arc<dyn BacklightSink>>>,
}

impl SinkSlot {
    pub fn new() -> SinkSlot {
        Self::default()
    }

    /// Binds the sink, replacing a previously bound one.
    pub fn bind(&self, sink: Arc<dyn BacklightSink>) {
        let mut slot = self.sink.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            log::warn!("Replacing already bound backlight sink");
        }
        *slot = Some(sink);
    }

    pub fn current(&self) -> Option<Arc<dyn BacklightSink>> {
        self.sink
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_backlight(&self, state: LedState) {
        let slot = self.sink.read().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(sink) => sink.set_backlight(state),
            None => log::debug!("No backlight sink bound yet, dropping {:?}", state),
        }
    }
}
