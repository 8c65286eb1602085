//! Daemon configuration, loaded from a TOML file

use std::{convert::TryFrom, path::Path, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::{
    control::{
        arbiter::TOUCHKEY_BAND_Y,
        config_state::{validate_timeout, Mode},
    },
    external::dbus::Bus,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub touchkey: TouchKeyConfig,
    pub led: LedConfig,
    pub display: DisplayConfig,
    pub touch: TouchConfig,
    pub dbus: DBusConfig,
}

/// Initial state of the backlight logic
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouchKeyConfig {
    pub mode: i64,
    pub timeout: i64,
    pub band_y: i32,
}

impl Default for TouchKeyConfig {
    fn default() -> Self {
        TouchKeyConfig {
            mode: 0,
            timeout: 0,
            band_y: TOUCHKEY_BAND_Y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedConfig {
    /// Name of the LED under /sys/class/leds
    pub device: String,
    /// Brightness used when lit, the LED's maximum if unset
    pub on_brightness: Option<u32>,
}

impl Default for LedConfig {
    fn default() -> Self {
        LedConfig {
            device: "button-backlight".to_owned(),
            on_brightness: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DisplaySource {
    #[serde(rename = "x11")]
    X11,
    #[serde(rename = "none")]
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub source: DisplaySource,
    pub x11_display: Option<String>,
    pub poll_interval_ms: u64,
}

impl DisplayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            source: DisplaySource::X11,
            x11_display: None,
            poll_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TouchConfig {
    /// evdev node of the touchscreen, touch input is only available over
    /// D-Bus if unset
    pub device: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DBusConfig {
    pub bus: Bus,
    pub path: Option<String>,
}

impl Config {
    pub fn parse(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text).context("Couldn't parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Couldn't read configuration file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        Mode::try_from(self.touchkey.mode).context("touchkey.mode")?;
        validate_timeout(self.touchkey.timeout).context("touchkey.timeout")?;
        if self.display.poll_interval_ms == 0 {
            bail!("display.poll_interval_ms must be positive");
        }
        Ok(())
    }
}
