use std::str::FromStr;

use super::configured_arbiter;
use crate::{
    armaf::{spawn_server, ActorRequestError},
    control::{
        arbiter::VERSION,
        config_state::{ConfigError, Mode},
        settings_controller::{Setting, SettingsController, SettingsPort, SettingsRequest},
    },
    external::led::LedState,
};

fn config_error(result: Result<String, ActorRequestError<anyhow::Error>>) -> ConfigError {
    match result {
        Err(ActorRequestError::Actor(e)) => e
            .downcast::<ConfigError>()
            .expect("Rejection should be a ConfigError"),
        other => panic!("Expected a rejection, got {:?}", other),
    }
}

async fn read(port: &SettingsPort, setting: Setting) -> String {
    port.request(SettingsRequest::Read(setting)).await.unwrap()
}

async fn write(
    port: &SettingsPort,
    setting: Setting,
    text: &str,
) -> Result<String, ActorRequestError<anyhow::Error>> {
    port.request(SettingsRequest::Write(setting, text.to_owned()))
        .await
}

#[tokio::test]
async fn test_reads() {
    let (arbiter, _) = configured_arbiter(2, 7);
    let port = spawn_server(SettingsController::new(arbiter)).await.unwrap();
    assert_eq!(read(&port, Setting::Mode).await, "2");
    assert_eq!(read(&port, Setting::Timeout).await, "7");
    assert_eq!(read(&port, Setting::Version).await, VERSION);
    port.await_shutdown().await;
}

#[tokio::test]
async fn test_writes() {
    let (arbiter, sink) = configured_arbiter(0, 0);
    let port = spawn_server(SettingsController::new(arbiter.clone()))
        .await
        .unwrap();

    assert_eq!(write(&port, Setting::Mode, "1\n").await.unwrap(), "1");
    assert_eq!(arbiter.mode(), Mode::TouchKeyOnly);
    assert_eq!(write(&port, Setting::Timeout, " 30 ").await.unwrap(), "30");
    assert_eq!(arbiter.timeout_seconds(), 30);
    assert_eq!(read(&port, Setting::Timeout).await, "30");
    // Every accepted write starts from a dark backlight
    assert_eq!(sink.commands(), vec![LedState::Off, LedState::Off]);
    port.await_shutdown().await;
}

#[tokio::test]
async fn test_rejected_writes() {
    let (arbiter, sink) = configured_arbiter(1, 4);
    let port = spawn_server(SettingsController::new(arbiter.clone()))
        .await
        .unwrap();

    assert_eq!(
        config_error(write(&port, Setting::Mode, "3").await),
        ConfigError::InvalidMode(3)
    );
    assert_eq!(
        config_error(write(&port, Setting::Timeout, "31").await),
        ConfigError::InvalidTimeout(31)
    );
    assert_eq!(
        config_error(write(&port, Setting::Timeout, "-2").await),
        ConfigError::InvalidTimeout(-2)
    );
    assert_eq!(
        config_error(write(&port, Setting::Mode, "one").await),
        ConfigError::Malformed("one".to_owned())
    );
    assert_eq!(
        config_error(write(&port, Setting::Timeout, "").await),
        ConfigError::Malformed("".to_owned())
    );
    assert_eq!(
        config_error(write(&port, Setting::Mode, "99999999999999999999").await),
        ConfigError::Malformed("99999999999999999999".to_owned())
    );
    assert_eq!(
        config_error(write(&port, Setting::Version, "2.0").await),
        ConfigError::ReadOnly("version")
    );

    assert_eq!(arbiter.mode(), Mode::TouchKeyOnly);
    assert_eq!(arbiter.timeout_seconds(), 4);
    assert!(sink.commands().is_empty());
    port.await_shutdown().await;
}

#[test]
fn test_setting_names() {
    for setting in [Setting::Mode, Setting::Timeout, Setting::Version] {
        assert_eq!(Setting::from_str(setting.name()), Ok(setting));
    }
    assert_eq!(Setting::from_str(" mode\n"), Ok(Setting::Mode));
    assert_eq!(
        Setting::from_str("brightness"),
        Err(ConfigError::UnknownSetting("brightness".to_owned()))
    );
}
