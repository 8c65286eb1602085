//! The textual key/value control surface of the daemon

use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;

use super::{
    arbiter::{Arbiter, VERSION},
    config_state::ConfigError,
};
use crate::armaf::{ActorPort, Server};

/// A setting exposed on the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    Mode,
    Timeout,
    Version,
}

impl Setting {
    pub fn name(&self) -> &'static str {
        match self {
            Setting::Mode => "mode",
            Setting::Timeout => "timeout",
            Setting::Version => "version",
        }
    }
}

impl FromStr for Setting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mode" => Ok(Setting::Mode),
            "timeout" => Ok(Setting::Timeout),
            "version" => Ok(Setting::Version),
            other => Err(ConfigError::UnknownSetting(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsRequest {
    Read(Setting),
    /// Carries the raw text written by the operator
    Write(Setting, String),
}

pub type SettingsPort = ActorPort<SettingsRequest, String, anyhow::Error>;

/// Serves reads and writes of `mode`, `timeout` and `version`.
///
/// Reads answer with the decimal value. Writes answer with the value as
/// stored. Anything that isn't a valid value is rejected with a
/// [ConfigError] and changes nothing.
pub struct SettingsController {
    arbiter: Arbiter,
}

impl SettingsController {
    pub fn new(arbiter: Arbiter) -> SettingsController {
        SettingsController { arbiter }
    }

    fn read(&self, setting: Setting) -> String {
        match setting {
            Setting::Mode => self.arbiter.mode().to_string(),
            Setting::Timeout => self.arbiter.timeout_seconds().to_string(),
            Setting::Version => VERSION.to_owned(),
        }
    }

    fn write(&self, setting: Setting, text: &str) -> Result<String, ConfigError> {
        match setting {
            Setting::Mode => Ok(self.arbiter.set_mode(parse_integer(text)?)?.to_string()),
            Setting::Timeout => Ok(self
                .arbiter
                .set_timeout(parse_integer(text)?)?
                .to_string()),
            Setting::Version => Err(ConfigError::ReadOnly(setting.name())),
        }
    }
}

fn parse_integer(text: &str) -> Result<i64, ConfigError> {
    text.trim()
        .parse()
        .map_err(|_| ConfigError::Malformed(text.to_owned()))
}

#[async_trait]
impl Server<SettingsRequest, String> for SettingsController {
    fn get_name(&self) -> String {
        "SettingsController".to_owned()
    }

    async fn handle_message(&mut self, payload: SettingsRequest) -> Result<String> {
        match payload {
            SettingsRequest::Read(setting) => Ok(self.read(setting)),
            SettingsRequest::Write(setting, text) => {
                log::debug!("Writing {:?} to {}", text, setting.name());
                Ok(self.write(setting, &text)?)
            }
        }
    }
}
