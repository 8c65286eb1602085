use std::sync::Arc;

use super::{
    dbus,
    display_power::{x11::X11DisplayPower, DisplayPowerSource},
    led::{logind::LogindLedSink, BacklightSink},
    touch::{evdev::EvdevTouchInput, TouchInput},
};
use crate::config::{Config, DisplayConfig, DisplaySource, LedConfig};
use anyhow::{anyhow, Context, Result};

/// Builds and hands out the platform collaborators the daemon talks to.
pub struct DependencyProvider {
    dbus_factory: Option<dbus::ConnectionFactory>,
    display_power: Option<Box<dyn DisplayPowerSource>>,
    touch_input: Option<Box<dyn TouchInput>>,
}

impl DependencyProvider {
    pub fn new(
        dbus_factory: Option<dbus::ConnectionFactory>,
        display_power: Option<Box<dyn DisplayPowerSource>>,
        touch_input: Option<Box<dyn TouchInput>>,
    ) -> DependencyProvider {
        DependencyProvider {
            dbus_factory,
            display_power,
            touch_input,
        }
    }

    pub async fn get_dbus_connection(&mut self, bus: dbus::Bus) -> Result<zbus::Connection> {
        if let Some(factory) = self.dbus_factory.as_mut() {
            Ok(factory.get(bus).await?)
        } else {
            Err(anyhow!(
                "No DBus connection factory in dependency DependencyProvider"
            ))
        }
    }

    pub fn get_display_power(&self) -> Option<&dyn DisplayPowerSource> {
        self.display_power.as_deref()
    }

    pub fn get_touch_input(&self) -> Option<&dyn TouchInput> {
        self.touch_input.as_deref()
    }

    /// Creates the sink for the configured LED, going through logind on the
    /// system bus.
    pub async fn make_backlight_sink(
        &mut self,
        config: &LedConfig,
    ) -> Result<Arc<dyn BacklightSink>> {
        let connection = self.get_dbus_connection(dbus::Bus::System).await?;
        let manager_proxy = logind_zbus::manager::ManagerProxy::new(&connection).await?;
        let session_path = manager_proxy
            .get_session_by_PID(std::process::id())
            .await
            .context("Couldn't find the logind session of the daemon")?;
        let sink = LogindLedSink::new(
            &config.device,
            config.on_brightness,
            connection,
            session_path.into_inner(),
        )
        .await?;
        Ok(Arc::new(sink))
    }

    pub async fn make_system(config: &Config) -> Result<Self> {
        let touch_input: Option<Box<dyn TouchInput>> = match &config.touch.device {
            Some(path) => Some(Box::new(EvdevTouchInput::open(path)?)),
            None => None,
        };
        Ok(DependencyProvider::new(
            Some(dbus::ConnectionFactory::new()),
            Self::make_display_power(&config.display),
            touch_input,
        ))
    }

    /// The display is only observed, so the daemon keeps running without it.
    fn make_display_power(config: &DisplayConfig) -> Option<Box<dyn DisplayPowerSource>> {
        match config.source {
            DisplaySource::X11 => {
                match X11DisplayPower::new(config.x11_display.as_deref(), config.poll_interval()) {
                    Ok(source) => Some(Box::new(source)),
                    Err(e) => {
                        log::warn!(
                            "X11 display power unavailable, the backlight won't follow the display: {:#}",
                            e
                        );
                        None
                    }
                }
            }
            DisplaySource::Disabled => {
                log::warn!("No display power source configured, the backlight won't follow the display");
                None
            }
        }
    }

    /// A provider backed by mocks. The returned mocks drive the provided
    /// sources.
    #[cfg(test)]
    pub fn make_mock() -> (
        Self,
        super::display_power::mock::MockDisplayPower,
        super::touch::mock::MockTouchInput,
    ) {
        use super::{display_power::mock::MockDisplayPower, touch::mock::MockTouchInput};

        let display_power = MockDisplayPower::new();
        let touch_input = MockTouchInput::new();
        (
            DependencyProvider::new(
                None,
                Some(Box::new(display_power.clone())),
                Some(Box::new(touch_input.clone())),
            ),
            display_power,
            touch_input,
        )
    }
}
