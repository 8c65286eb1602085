//! Decides when the touch-key backlight may be lit.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    time::Duration,
};

use tokio::runtime::Handle;

use super::{
    config_state::{ConfigError, ConfigState, Configuration, Mode},
    decay_timer::{DecayTimer, ExpiryToken, TimerState},
    sink_slot::SinkSlot,
};
use crate::external::{
    display_power::DisplayPowerEvent,
    led::{BacklightSink, LedState},
    touch::TouchEvent,
};

/// Touches with a vertical coordinate past this one land on the touch-key strip
/// of the reference panel.
pub const TOUCHKEY_BAND_Y: i32 = 1900;

/// Revision of the backlight behavior implemented by the [Arbiter]
pub const VERSION: &str = "1.1.0";

struct Shared {
    config: ConfigState,
    /// Guards the timer slot and serializes configuration writes with it.
    /// Backlight commands are issued while holding it, so that they reach the
    /// sink in the order the decisions were made.
    timer: Mutex<DecayTimer>,
    sink: SinkSlot,
    band_y: i32,
    runtime: Handle,
}

/// The decision engine for the touch-key backlight.
///
/// Reacts to touches, display power changes and configuration writes by
/// commanding the bound [BacklightSink] and arming or cancelling the decay
/// timer. [Arbiter::may_activate] lets the rest of the system ask whether it
/// may switch the backlight itself. Clones share the same state.
#[derive(Clone)]
pub struct Arbiter {
    shared: Arc<Shared>,
}

impl Arbiter {
    /// Create an arbiter with the default configuration.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime, which hosts the decay
    /// timer.
    pub fn new(band_y: i32) -> Arbiter {
        Arbiter {
            shared: Arc::new(Shared {
                config: ConfigState::new(),
                timer: Mutex::new(DecayTimer::new()),
                sink: SinkSlot::new(),
                band_y,
                runtime: Handle::current(),
            }),
        }
    }

    /// Hand the arbiter the sink it should command. May be called again to
    /// replace it.
    pub fn bind_sink(&self, sink: Arc<dyn BacklightSink>) {
        log::info!("Backlight sink bound");
        self.shared.sink.bind(sink);
    }

    pub fn mode(&self) -> Mode {
        self.shared.config.mode()
    }

    pub fn timeout_seconds(&self) -> u8 {
        self.shared.config.timeout_seconds()
    }

    pub fn configuration(&self) -> Configuration {
        self.shared.config.configuration()
    }

    pub fn band_y(&self) -> i32 {
        self.shared.band_y
    }

    pub fn timer_state(&self) -> TimerState {
        self.lock_timer().state()
    }

    /// Switch to another mode. Any decay is cancelled and the backlight is
    /// turned off, so that every mode starts out dark.
    pub fn set_mode(&self, value: i64) -> Result<Mode, ConfigError> {
        let mut timer = self.lock_timer();
        let mode = self.shared.config.set_mode(value)?;
        log::info!("Mode set to {:?}", mode);
        self.reset(&mut timer);
        Ok(mode)
    }

    /// Change the decay timeout, 0 leaving the decay to the system. Like
    /// [Arbiter::set_mode], this cancels any decay and turns the backlight off.
    pub fn set_timeout(&self, value: i64) -> Result<u8, ConfigError> {
        let mut timer = self.lock_timer();
        let timeout = self.shared.config.set_timeout(value)?;
        log::info!("Timeout set to {} s", timeout);
        self.reset(&mut timer);
        Ok(timeout)
    }

    /// Handle a touch sample of the first finger.
    pub fn on_touch(&self, event: TouchEvent) {
        if self.mode() != Mode::TouchKeyOnly || event.y <= self.shared.band_y {
            return;
        }
        let mut timer = self.lock_timer();
        // The mode may have changed while we were waiting for the lock
        if self.mode() != Mode::TouchKeyOnly {
            return;
        }
        log::debug!("Touch key pressed at {:?}", event);
        self.shared.sink.set_backlight(LedState::On);
        let timeout = self.timeout_seconds();
        if timeout > 0 {
            let weak = Arc::downgrade(&self.shared);
            timer.arm(
                &self.shared.runtime,
                Duration::from_secs(timeout.into()),
                move |token| expire(weak, token),
            );
        }
    }

    /// Whether a request to switch the backlight to `requested` coming from
    /// outside must be blocked.
    ///
    /// Doesn't take any lock, it's safe to call from hot paths.
    pub fn may_activate(&self, requested: LedState) -> bool {
        match (self.mode(), requested) {
            (Mode::Normal, _) => false,
            (_, LedState::On) => true,
            // While a decay timer runs, it decides when the light goes off
            (Mode::TouchKeyOnly, LedState::Off) => self.timeout_seconds() > 0,
            (Mode::Off, LedState::Off) => false,
        }
    }

    /// The display started turning off. Applies regardless of the mode.
    pub fn on_display_off(&self) {
        log::debug!("Display turning off, switching backlight off");
        self.switch_off();
    }

    pub fn on_display_on(&self) {
        log::debug!("Display turned on");
    }

    pub fn on_display_event(&self, event: DisplayPowerEvent) {
        match event {
            DisplayPowerEvent::Off => self.on_display_off(),
            DisplayPowerEvent::On => self.on_display_on(),
        }
    }

    /// Cancels any decay and turns the backlight off.
    pub fn switch_off(&self) {
        let mut timer = self.lock_timer();
        self.reset(&mut timer);
    }

    /// Turns the backlight off and waits, at most `timeout`, for the sink to
    /// carry out every command issued so far.
    pub async fn shut_down(&self, timeout: Duration) {
        self.switch_off();
        let sink = match self.shared.sink.current() {
            Some(sink) => sink,
            None => return,
        };
        if tokio::time::timeout(timeout, sink.drain()).await.is_err() {
            log::warn!(
                "Backlight sink didn't finish within {:?}, the backlight may stay lit",
                timeout
            );
        }
    }

    fn reset(&self, timer: &mut DecayTimer) {
        timer.cancel();
        self.shared.sink.set_backlight(LedState::Off);
    }

    fn lock_timer(&self) -> MutexGuard<'_, DecayTimer> {
        lock(&self.shared.timer)
    }
}

fn lock(timer: &Mutex<DecayTimer>) -> MutexGuard<'_, DecayTimer> {
    timer.lock().unwrap_or_else(PoisonError::into_inner)
}

fn expire(shared: Weak<Shared>, token: ExpiryToken) {
    let shared = match shared.upgrade() {
        Some(shared) => shared,
        None => return,
    };
    let mut timer = lock(&shared.timer);
    if timer.claim(token) {
        log::debug!("Decay timeout over, switching backlight off");
        shared.sink.set_backlight(LedState::Off);
    }
}
