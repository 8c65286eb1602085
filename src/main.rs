//! A touch-key backlight controller for Linux devices

mod armaf;
mod config;
mod control;
mod external;
mod system;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use tokio::signal::unix::{signal, SignalKind};

use crate::{
    armaf::{spawn_server, Handle},
    config::Config,
    control::{
        arbiter::Arbiter, dbus_controller::DBusController,
        settings_controller::SettingsController,
    },
    external::dependency_provider::DependencyProvider,
    system::{display_power_observer::DisplayPowerObserver, touch_sensor::TouchSensor},
};

/// How long to wait between attempts to reach the LED
const SINK_RETRY_INTERVAL: Duration = Duration::from_secs(5);

/// How long shutdown waits for the last LED commands to go through
const SINK_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Decides when the touch-key backlight may be lit
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to the TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level, regardless of RUST_LOG
    #[clap(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _logger = start_logger(args.verbose)?;
    log_panics::init();

    let config = match &args.config {
        Some(path) => Config::load(path).await?,
        None => {
            log::info!("No configuration file given, using defaults");
            Config::default()
        }
    };
    run(config).await
}

fn start_logger(verbose: bool) -> Result<LoggerHandle> {
    let logger = if verbose {
        Logger::try_with_str("debug")?
    } else {
        Logger::try_with_env_or_str("info")?
    };
    Ok(logger.format(flexi_logger::detailed_format).start()?)
}

async fn run(config: Config) -> Result<()> {
    let mut provider = DependencyProvider::make_system(&config).await?;

    let arbiter = Arbiter::new(config.touchkey.band_y);
    arbiter.set_mode(config.touchkey.mode)?;
    arbiter.set_timeout(config.touchkey.timeout)?;
    log::info!(
        "Starting with {:?}, touch keys below y = {}",
        arbiter.configuration(),
        arbiter.band_y()
    );

    let mut handles: Vec<Handle> = Vec::new();
    if let Some(source) = provider.get_display_power() {
        handles.push(DisplayPowerObserver::new(source, arbiter.clone()).spawn());
    }
    if let Some(input) = provider.get_touch_input() {
        handles.push(TouchSensor::new(input, arbiter.clone()).spawn());
    }
    let settings = spawn_server(SettingsController::new(arbiter.clone())).await?;
    handles.push(
        DBusController::new(
            config.dbus.path.as_deref(),
            config.dbus.bus,
            settings,
            arbiter.clone(),
        )
        .spawn()
        .await
        .context("Couldn't publish the control interface on D-Bus")?,
    );
    log::info!("touchkeyd {} started", env!("CARGO_PKG_VERSION"));

    let mut terminate = signal(SignalKind::terminate())?;
    let mut retry = tokio::time::interval(SINK_RETRY_INTERVAL);
    let mut sink_bound = false;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = terminate.recv() => break,
            _ = retry.tick(), if !sink_bound => {
                match provider.make_backlight_sink(&config.led).await {
                    Ok(sink) => {
                        arbiter.bind_sink(sink);
                        sink_bound = true;
                    }
                    Err(e) => log::warn!("LED {} not available yet: {:#}", config.led.device, e),
                }
            }
        }
    }

    log::info!("Shutting down");
    for handle in handles {
        handle.await_shutdown().await;
    }
    arbiter.shut_down(SINK_DRAIN_TIMEOUT).await;
    Ok(())
}
