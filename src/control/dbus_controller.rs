use std::str::FromStr;

use super::{
    arbiter::Arbiter,
    settings_controller::{Setting, SettingsPort, SettingsRequest},
};
use crate::{
    armaf::{ActorRequestError, Handle},
    external::{dbus::Bus, led::LedState, touch::TouchEvent},
};

pub const DEFAULT_PATH: &str = "/org/touchkeyd/Control";
pub const BUS_NAME: &str = "org.touchkeyd.Control";

/// Publishes the control surface, the activation gate and touch injection on
/// D-Bus.
pub struct DBusController {
    path: Option<String>,
    bus: Bus,
    settings: SettingsPort,
    arbiter: Arbiter,
}

impl DBusController {
    pub fn new(
        path: Option<&str>,
        bus: Bus,
        settings: SettingsPort,
        arbiter: Arbiter,
    ) -> DBusController {
        DBusController {
            path: path.map(|s| s.to_owned()),
            bus,
            settings,
            arbiter,
        }
    }

    /// Registers the object on the bus. It stays registered until the
    /// returned [Handle] is dropped or shut down.
    pub async fn spawn(self) -> anyhow::Result<Handle> {
        let (handle, mut handle_child) = Handle::new();
        let path = self
            .path
            .clone()
            .unwrap_or_else(|| DEFAULT_PATH.to_string());
        let builder = match self.bus {
            Bus::System => zbus::ConnectionBuilder::system()?,
            Bus::Session => zbus::ConnectionBuilder::session()?,
        };
        let connection = builder
            .name(BUS_NAME)?
            .serve_at(path.as_str(), self)?
            .build()
            .await?;

        log::debug!("Bound to D-Bus at {}", path);
        tokio::spawn(async move {
            let moved_connection = connection;
            handle_child.should_terminate().await;
            if let Err(e) = moved_connection
                .object_server()
                .remove::<Self, String>(path)
                .await
            {
                log::error!("Failed to unregister control object: {}", e);
            }
            log::debug!("D-Bus controller terminated");
        });
        Ok(handle)
    }

    async fn forward(&self, request: SettingsRequest) -> zbus::fdo::Result<String> {
        match self.settings.request(request).await {
            Ok(value) => Ok(value),
            Err(ActorRequestError::Actor(e)) => Err(zbus::fdo::Error::Failed(e.to_string())),
            Err(e) => Err(zbus::fdo::Error::Failed(format!("{}", e))),
        }
    }
}

#[zbus::dbus_interface(name = "org.touchkeyd.Control")]
impl DBusController {
    async fn read(&self, key: &str) -> zbus::fdo::Result<String> {
        let setting = parse_setting(key)?;
        self.forward(SettingsRequest::Read(setting)).await
    }

    async fn write(&self, key: &str, value: &str) -> zbus::fdo::Result<()> {
        let setting = parse_setting(key)?;
        log::info!("Writing {:?} to {} over D-Bus", value, key);
        self.forward(SettingsRequest::Write(setting, value.to_owned()))
            .await
            .map(|_| ())
    }

    /// Returns true if switching the backlight on (or off) must be blocked
    async fn query_gate(&self, turn_on: bool) -> bool {
        let requested = if turn_on { LedState::On } else { LedState::Off };
        self.arbiter.may_activate(requested)
    }

    async fn touch(&self, x: i32, y: i32) {
        self.arbiter.on_touch(TouchEvent::new(x, y));
    }
}

fn parse_setting(key: &str) -> zbus::fdo::Result<Setting> {
    Setting::from_str(key).map_err(|e| zbus::fdo::Error::Failed(e.to_string()))
}
