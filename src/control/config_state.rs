//! Operator-selected configuration of the touch-key backlight

use std::{
    convert::TryFrom,
    fmt,
    sync::atomic::{AtomicU8, Ordering},
};
use thiserror::Error;

/// Longest decay timeout which can be configured, in seconds
pub const TIMEOUT_MAX: u8 = 30;

/// Who is allowed to turn the touch-key backlight on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The system owns the backlight, nothing is blocked or forced
    Normal,
    /// Only touches landing on the touch keys turn the backlight on
    TouchKeyOnly,
    /// The backlight stays off
    Off,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> u8 {
        match mode {
            Mode::Normal => 0,
            Mode::TouchKeyOnly => 1,
            Mode::Off => 2,
        }
    }
}

impl TryFrom<i64> for Mode {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Normal),
            1 => Ok(Mode::TouchKeyOnly),
            2 => Ok(Mode::Off),
            _ => Err(ConfigError::InvalidMode(value)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// A rejected configuration write. The previous configuration stays in place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid mode {0}, expected 0 (normal), 1 (touch keys only) or 2 (off)")]
    InvalidMode(i64),

    #[error("invalid timeout {0}, expected 0 to 30 seconds")]
    InvalidTimeout(i64),

    #[error("{0:?} is not an integer")]
    Malformed(String),

    #[error("unknown setting {0:?}")]
    UnknownSetting(String),

    #[error("setting {0} is read-only")]
    ReadOnly(&'static str),
}

/// Checks that `value` is an acceptable timeout, 0 meaning no decay timer.
pub fn validate_timeout(value: i64) -> Result<u8, ConfigError> {
    if (0..=i64::from(TIMEOUT_MAX)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ConfigError::InvalidTimeout(value))
    }
}

/// A consistent snapshot of the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Configuration {
    pub mode: Mode,
    pub timeout_seconds: u8,
}

/// The live configuration, readable without locking.
///
/// Only validated values are ever stored, so readers can't observe anything
/// that wasn't set on purpose. Writers are expected to serialize among
/// themselves, which [super::arbiter::Arbiter] does.
#[derive(Debug, Default)]
pub struct ConfigState {
    mode: AtomicU8,
    timeout_seconds: AtomicU8,
}

impl ConfigState {
    pub fn new() -> ConfigState {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        match self.mode.load(Ordering::Acquire) {
            1 => Mode::TouchKeyOnly,
            2 => Mode::Off,
            _ => Mode::Normal,
        }
    }

    pub fn timeout_seconds(&self) -> u8 {
        self.timeout_seconds.load(Ordering::Acquire)
    }

    pub fn configuration(&self) -> Configuration {
        Configuration {
            mode: self.mode(),
            timeout_seconds: self.timeout_seconds(),
        }
    }

    pub(super) fn set_mode(&self, value: i64) -> Result<Mode, ConfigError> {
        let mode = Mode::try_from(value)?;
        self.mode.store(mode.into(), Ordering::Release);
        Ok(mode)
    }

    pub(super) fn set_timeout(&self, value: i64) -> Result<u8, ConfigError> {
        let timeout = validate_timeout(value)?;
        self.timeout_seconds.store(timeout, Ordering::Release);
        Ok(timeout)
    }
}
