use super::{BacklightSink, LedState};
use anyhow::{Context, Result};
use async_trait::async_trait;
use logind_zbus::session::SessionProxy;
use std::{
    path::Path,
    sync::{Mutex, PoisonError},
};
use tokio::{fs, io::AsyncReadExt, sync::mpsc, task::JoinHandle};
use zbus::zvariant::ObjectPath;

/// A [BacklightSink] driving an LED from the kernel's /sys/class/leds device
/// class.
///
/// Writes are mediated by logind Session's SetBrightness method, so the daemon
/// doesn't need root. Commands are queued to a single worker task, which keeps
/// them in issue order.
#[derive(Debug)]
pub struct LogindLedSink {
    command_sender: Mutex<Option<mpsc::UnboundedSender<LedState>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl LogindLedSink {
    /// Create a sink for the LED under /sys/class/leds/{device}.
    ///
    /// The LED is lit with `on_brightness` if given, with its maximum
    /// brightness otherwise.
    pub async fn new(
        device: &str,
        on_brightness: Option<u32>,
        connection: zbus::Connection,
        session_path: ObjectPath<'static>,
    ) -> Result<LogindLedSink> {
        let proxy = SessionProxy::builder(&connection)
            .path(session_path)?
            .build()
            .await?;
        let max_brightness =
            read_number_from_file(format!("/sys/class/leds/{}/max_brightness", device))
                .await
                .with_context(|| format!("Couldn't read maximum brightness of LED {}", device))?;
        let on_brightness = on_brightness.unwrap_or(max_brightness).min(max_brightness);
        log::debug!(
            "LED {} will be lit with brightness {} (max {})",
            device,
            on_brightness,
            max_brightness
        );

        let (command_sender, mut command_receiver) = mpsc::unbounded_channel();
        let device = device.to_owned();
        let worker = tokio::spawn(async move {
            while let Some(state) = command_receiver.recv().await {
                let brightness = match state {
                    LedState::On => on_brightness,
                    LedState::Off => 0,
                };
                if let Err(e) = proxy.set_brightness("leds", &device, brightness).await {
                    log::error!("Couldn't set brightness of LED {}: {}", device, e);
                }
            }
            log::debug!("LED {} command worker stopped", device);
        });
        Ok(LogindLedSink {
            command_sender: Mutex::new(Some(command_sender)),
            worker: Mutex::new(Some(worker)),
        })
    }
}

#[async_trait]
impl BacklightSink for LogindLedSink {
    fn set_backlight(&self, state: LedState) {
        let sender = self
            .command_sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) if sender.send(state).is_ok() => {}
            _ => log::error!("LED command worker is gone, dropping {:?}", state),
        }
    }

    async fn drain(&self) {
        // Closing the queue lets the worker finish what is already in it
        self.command_sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                log::error!("LED command worker failed: {}", e);
            }
        }
    }
}

async fn read_number_from_file(path: impl AsRef<Path>) -> Result<u32> {
    let mut f = fs::File::open(path).await?;
    let mut contents = String::new();
    f.read_to_string(&mut contents).await?;
    Ok(contents.trim().parse()?)
}
