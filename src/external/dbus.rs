use log::info;
use serde::Deserialize;

/// Which message bus a D-Bus facing component should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bus {
    System,
    Session,
}

impl Default for Bus {
    fn default() -> Self {
        Bus::System
    }
}

/// Lazily opens and hands out clones of [zbus::Connection]s, so that every
/// component shares one connection per bus.
#[derive(Default)]
pub struct ConnectionFactory {
    system: Option<zbus::Connection>,
    session: Option<zbus::Connection>,
}

impl ConnectionFactory {
    /// No connection is opened until one is requested.
    pub fn new() -> ConnectionFactory {
        Self::default()
    }

    pub async fn get(&mut self, bus: Bus) -> zbus::Result<zbus::Connection> {
        match bus {
            Bus::System => self.get_system().await,
            Bus::Session => self.get_session().await,
        }
    }

    /// Get a connection to the system-wide D-Bus
    pub async fn get_system(&mut self) -> zbus::Result<zbus::Connection> {
        if let Some(c) = &self.system {
            return Ok(c.clone());
        }
        info!("Creating a new connection to the system bus");
        let connection = zbus::Connection::system().await?;
        self.system = Some(connection.clone());
        Ok(connection)
    }

    /// Get a connection to the session's / user's D-Bus
    pub async fn get_session(&mut self) -> zbus::Result<zbus::Connection> {
        if let Some(c) = &self.session {
            return Ok(c.clone());
        }
        info!("Creating a new connection to the session bus");
        let connection = zbus::Connection::session().await?;
        self.session = Some(connection.clone());
        Ok(connection)
    }
}
