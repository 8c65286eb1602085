use super::server::{spawn_server, Server};
use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Counts brightness steps up to a limit and reports teardown.
struct StepServer {
    level: usize,
    max_level: usize,
    refuse_start: bool,
    teardown_notifier: mpsc::Sender<usize>,
}

impl StepServer {
    fn new(max_level: usize, refuse_start: bool) -> (StepServer, mpsc::Receiver<usize>) {
        let (teardown_notifier, teardown_receiver) = mpsc::channel(1);
        (
            StepServer {
                level: 0,
                max_level,
                refuse_start,
                teardown_notifier,
            },
            teardown_receiver,
        )
    }
}

#[async_trait]
impl Server<(), usize> for StepServer {
    fn get_name(&self) -> String {
        "StepServer".to_owned()
    }

    async fn handle_message(&mut self, _: ()) -> Result<usize> {
        if self.level == self.max_level {
            bail!("Already at maximum");
        }
        self.level += 1;
        Ok(self.level)
    }

    async fn initialize(&mut self) -> Result<()> {
        if self.refuse_start {
            bail!("Refusing to start");
        }
        Ok(())
    }

    async fn tear_down(&mut self) -> Result<()> {
        Ok(self.teardown_notifier.send(self.level).await?)
    }
}

#[tokio::test]
async fn test_requests_and_teardown() {
    let (server, mut teardown) = StepServer::new(2, false);
    let port = spawn_server(server).await.expect("No port returned");
    assert_eq!(port.request(()).await.unwrap(), 1);
    assert_eq!(port.request(()).await.unwrap(), 2);
    assert!(port.request(()).await.is_err());
    drop(port);
    assert_eq!(teardown.recv().await, Some(2));
}

#[tokio::test]
async fn test_initialization_failure() {
    let (server, _) = StepServer::new(3, true);
    assert!(spawn_server(server).await.is_err());
}
