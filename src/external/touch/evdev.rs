use std::path::Path;

use super::{TouchEvent, TouchInput};
use anyhow::{Context, Result};
use evdev::{AbsoluteAxisType, Device, InputEvent, InputEventKind, Key, Synchronization};
use tokio::{sync::broadcast, task::JoinHandle};

/// Follows the first finger through the stream of input events.
///
/// Multitouch devices are tracked through slot 0 of the MT protocol B. Devices
/// without MT axes are tracked through ABS_X/ABS_Y and BTN_TOUCH.
/// A sample is produced on every SYN_REPORT which closes a frame in which the
/// finger went down or moved.
#[derive(Debug, Default)]
pub struct ContactTracker {
    multitouch: bool,
    current_slot: i32,
    in_contact: bool,
    changed: bool,
    x: i32,
    y: i32,
}

impl ContactTracker {
    pub fn new(multitouch: bool) -> ContactTracker {
        ContactTracker {
            multitouch,
            ..Default::default()
        }
    }

    pub fn feed(&mut self, event: InputEvent) -> Option<TouchEvent> {
        match event.kind() {
            InputEventKind::Synchronization(Synchronization::SYN_REPORT) => {
                let sample = if self.in_contact && self.changed {
                    Some(TouchEvent::new(self.x, self.y))
                } else {
                    None
                };
                self.changed = false;
                sample
            }
            InputEventKind::Synchronization(Synchronization::SYN_DROPPED) => {
                log::warn!("Touch events dropped by the kernel");
                self.changed = false;
                None
            }
            InputEventKind::AbsAxis(axis) if self.multitouch => {
                self.feed_multitouch(axis, event.value());
                None
            }
            // MT devices also emulate a single pointer with these
            InputEventKind::AbsAxis(AbsoluteAxisType::ABS_X) => {
                self.x = event.value();
                self.changed = true;
                None
            }
            InputEventKind::AbsAxis(AbsoluteAxisType::ABS_Y) => {
                self.y = event.value();
                self.changed = true;
                None
            }
            InputEventKind::Key(Key::BTN_TOUCH) if !self.multitouch => {
                self.in_contact = event.value() != 0;
                self.changed = self.in_contact;
                None
            }
            _ => None,
        }
    }

    fn feed_multitouch(&mut self, axis: AbsoluteAxisType, value: i32) {
        if axis == AbsoluteAxisType::ABS_MT_SLOT {
            self.current_slot = value;
            return;
        }
        if self.current_slot != 0 {
            return;
        }
        match axis {
            AbsoluteAxisType::ABS_MT_TRACKING_ID => {
                self.in_contact = value != -1;
                self.changed = self.in_contact;
            }
            AbsoluteAxisType::ABS_MT_POSITION_X => {
                self.x = value;
                self.changed = true;
            }
            AbsoluteAxisType::ABS_MT_POSITION_Y => {
                self.y = value;
                self.changed = true;
            }
            _ => {}
        }
    }
}

/// A [TouchInput] reading a touchscreen's /dev/input/event* node.
#[derive(Debug)]
pub struct EvdevTouchInput {
    sender: broadcast::Sender<TouchEvent>,
    reader: JoinHandle<()>,
}

impl EvdevTouchInput {
    pub fn open(path: impl AsRef<Path>) -> Result<EvdevTouchInput> {
        let path = path.as_ref();
        let device = Device::open(path)
            .with_context(|| format!("Couldn't open touch device {}", path.display()))?;
        let multitouch = device
            .supported_absolute_axes()
            .map_or(false, |axes| axes.contains(AbsoluteAxisType::ABS_MT_SLOT));
        log::info!(
            "Reading touch samples from {} ({}, multitouch: {})",
            path.display(),
            device.name().unwrap_or("unnamed"),
            multitouch
        );
        let mut events = device
            .into_event_stream()
            .with_context(|| format!("Couldn't stream events of {}", path.display()))?;

        let (sender, _) = broadcast::channel(16);
        let event_sender = sender.clone();
        let device_name = path.display().to_string();
        let reader = tokio::spawn(async move {
            let mut tracker = ContactTracker::new(multitouch);
            loop {
                let event = match events.next_event().await {
                    Ok(event) => event,
                    Err(e) => {
                        log::error!("Reading from touch device {} failed: {}", device_name, e);
                        return;
                    }
                };
                if let Some(sample) = tracker.feed(event) {
                    log::trace!("Touch sample {:?}", sample);
                    // Having no subscribers at the moment is fine
                    let _ = event_sender.send(sample);
                }
            }
        });
        Ok(EvdevTouchInput { sender, reader })
    }
}

impl TouchInput for EvdevTouchInput {
    fn subscribe(&self) -> broadcast::Receiver<TouchEvent> {
        self.sender.subscribe()
    }
}

impl Drop for EvdevTouchInput {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
