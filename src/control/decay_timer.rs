//! Single-slot delayed action turning the backlight off

use std::time::Duration;
use tokio::{runtime::Handle, task::JoinHandle, time::Instant};

/// Identifies one arming of a [DecayTimer]. An expiry is only valid if its
/// token still matches the armed slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Armed(Instant),
}

#[derive(Debug)]
struct ArmedSlot {
    deadline: Instant,
    token: ExpiryToken,
    task: JoinHandle<()>,
}

/// A delayed action with room for one pending expiry.
///
/// Arming replaces whatever was armed before. The expiry callback receives the
/// [ExpiryToken] of its arming and must call [DecayTimer::claim] with it while
/// holding the same lock the owner uses for [DecayTimer::arm] and
/// [DecayTimer::cancel]. Only a successful claim may act on the expiry; this
/// is what keeps superseded or cancelled expiries from firing when their task
/// already woke up.
#[derive(Debug, Default)]
pub struct DecayTimer {
    generation: u64,
    slot: Option<ArmedSlot>,
}

impl DecayTimer {
    pub fn new() -> DecayTimer {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        match &self.slot {
            Some(slot) => TimerState::Armed(slot.deadline),
            None => TimerState::Idle,
        }
    }

    /// Cancels any pending expiry and schedules `on_expiry` to run on
    /// `runtime` after `duration`.
    pub fn arm<F>(&mut self, runtime: &Handle, duration: Duration, on_expiry: F)
    where
        F: FnOnce(ExpiryToken) + Send + 'static,
    {
        self.cancel();
        self.generation += 1;
        let token = ExpiryToken(self.generation);
        let deadline = Instant::now() + duration;
        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            on_expiry(token);
        });
        self.slot = Some(ArmedSlot {
            deadline,
            token,
            task,
        });
    }

    /// Makes sure no future expiry fires. Returns whether something was armed.
    pub fn cancel(&mut self) -> bool {
        match self.slot.take() {
            Some(slot) => {
                slot.task.abort();
                true
            }
            None => false,
        }
    }

    /// Commits an expiry. Returns false if the arming identified by `token`
    /// was cancelled or superseded in the meantime.
    pub fn claim(&mut self, token: ExpiryToken) -> bool {
        match &self.slot {
            Some(slot) if slot.token == token => {
                self.slot = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for DecayTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
