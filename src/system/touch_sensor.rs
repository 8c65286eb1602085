//! Forwards touch samples to the [Arbiter]

use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    armaf::{Handle, HandleChild},
    control::arbiter::Arbiter,
    external::touch::{TouchEvent, TouchInput},
};

pub struct TouchSensor {
    samples: broadcast::Receiver<TouchEvent>,
    arbiter: Arbiter,
}

impl TouchSensor {
    pub fn new(input: &dyn TouchInput, arbiter: Arbiter) -> TouchSensor {
        TouchSensor {
            samples: input.subscribe(),
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

    async fn main_loop(mut self, mut handle_child: HandleChild) {
        loop {
            tokio::select! {
                _ = handle_child.should_terminate() => {
                    log::info!("Terminating TouchSensor");
                    return;
                }
                received = self.samples.recv() => match received {
                    Ok(sample) => self.arbiter.on_touch(sample),
                    // Stale samples are useless, we just continue with the newest ones
                    Err(RecvError::Lagged(missed)) => {
                        log::debug!("Skipped {} touch samples", missed);
                    }
                    Err(RecvError::Closed) => {
                        log::info!("Touch input closed, terminating TouchSensor");
                        return;
                    }
                }
            }
        }
    }
}
