//! Request-serving actors built on top of [super::ports]

use super::ActorPort;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::oneshot;

/// An actor which answers requests arriving on its [ActorPort], one at a time.
///
/// A server goes through three phases. [Server::initialize] runs before
/// [spawn_server] returns and can make spawning fail. [Server::handle_message]
/// then runs for every request, its result being sent back to the requester.
/// Once all ports are dropped, [Server::tear_down] gets a chance to put the
/// component it controls back into a sane state, for example switching off a
/// light it turned on.
#[async_trait]
pub trait Server<P, R>: Send + 'static {
    /// Name used in log messages
    fn get_name(&self) -> String;

    async fn handle_message(&mut self, payload: P) -> Result<R>;

    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Errors returned from here are only logged.
    async fn tear_down(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Moves the server into its own task and returns the port it listens on.
///
/// Waits for [Server::initialize] to finish and returns its error if it fails.
pub async fn spawn_server<P, R>(
    mut server: impl Server<P, R>,
) -> Result<ActorPort<P, R, anyhow::Error>>
where
    P: Send + 'static,
    R: Send + 'static,
{
    let name = server.get_name();
    log::debug!("{} spawning", name);
    let (port, mut rx) = ActorPort::make();
    let (initialization_sender, initialization_receiver) = oneshot::channel::<Result<()>>();
    tokio::spawn(async move {
        let name = server.get_name();
        let init_result = server.initialize().await;
        let had_init_error = init_result.is_err();
        if initialization_sender.send(init_result).is_err() || had_init_error {
            return;
        }
        log::info!("{} initialized successfully", name);
        while let Some(req) = rx.recv().await {
            let res = server.handle_message(req.payload).await;
            if let Err(e) = &res {
                log::warn!("{} rejected request: {}", name, e);
            }
            if req.response_sender.send(res).is_err() {
                log::error!("{} failed to respond to request (requester went away?)", name);
            }
        }
        log::debug!("{} stopping", name);
        if let Err(e) = server.tear_down().await {
            log::error!("{} failed to tear down: {}", name, e);
        }
        log::debug!("{} stopped", name);
    });

    match initialization_receiver.await {
        Ok(Ok(_)) => Ok(port),
        Ok(Err(e)) => {
            log::error!("Error initializing {}: {}", name, e);
            Err(e)
        }
        Err(e) => Err(anyhow!(e)),
    }
}
