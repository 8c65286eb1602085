use super::ports;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

#[tokio::test]
async fn test_request_respond() {
    let (request, receiver) = ports::Request::<&str, usize, ()>::new("mode");
    assert_eq!(request.payload, "mode");
    request
        .respond(Ok(1))
        .expect("Channel failure when sending response");
    assert_eq!(
        receiver
            .await
            .expect("Channel failure when receiving response"),
        Ok(1)
    );
}

#[tokio::test]
async fn test_port_round_trip() {
    let stopped = make_flag();
    let port = spawn_switch_counter(stopped.clone());
    assert_eq!(port.request(SwitchMessage::Toggle).await.unwrap(), 1);
    assert_eq!(port.request(SwitchMessage::Toggle).await.unwrap(), 2);
    match port.request(SwitchMessage::Toggle).await {
        Err(ports::ActorRequestError::Actor(e)) => {
            assert_eq!(e.to_string(), "Worn out");
        }
        other => panic!("Unexpected response {:?}", other.map(|_| ())),
    }
    assert!(!stopped.load(Ordering::Acquire));
    port.await_shutdown().await;
    assert!(stopped.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_send_and_recv_errors() {
    let stopped = make_flag();
    let port = spawn_switch_counter(stopped.clone());
    let recv_error = port
        .request(SwitchMessage::Vanish)
        .await
        .expect_err("Dropped request must surface as an error");
    assert!(matches!(recv_error, ports::ActorRequestError::Recv));
    let send_error = port
        .request(SwitchMessage::Toggle)
        .await
        .expect_err("Port of a dead actor must not accept requests");
    assert!(matches!(send_error, ports::ActorRequestError::Send));
    // Hangs if the receiver doesn't release the shutdown notifier on drop
    port.await_shutdown().await;
}

#[tokio::test]
async fn test_handle_drop() {
    let flag = make_flag();
    let handle = spawn_handle_tester(flag.clone());
    assert!(!flag.load(Ordering::Acquire));
    drop(handle);
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(flag.load(Ordering::Acquire));
}

#[tokio::test]
async fn test_handle_await() {
    let flag = make_flag();
    let handle = spawn_handle_tester(flag.clone());
    handle.await_shutdown().await;
    assert!(flag.load(Ordering::Acquire));
}

enum SwitchMessage {
    Toggle,
    // Only for exercising the error paths, a real actor always responds.
    Vanish,
}

fn spawn_switch_counter(
    stopped: Arc<AtomicBool>,
) -> ports::ActorPort<SwitchMessage, usize, std::io::Error> {
    let (port, mut rx) = ports::ActorPort::make();
    tokio::spawn(async move {
        let mut toggles = 0;
        while let Some(req) = rx.recv().await {
            match req.payload {
                SwitchMessage::Toggle if toggles < 2 => {
                    toggles += 1;
                    req.respond(Ok(toggles)).unwrap();
                }
                SwitchMessage::Toggle => {
                    req.respond(Err(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "Worn out",
                    )))
                    .unwrap();
                }
                SwitchMessage::Vanish => return,
            }
        }
        stopped.store(true, Ordering::Release);
    });
    port
}

fn spawn_handle_tester(flag: Arc<AtomicBool>) -> ports::Handle {
    let (handle, mut handle_child) = ports::Handle::new();
    tokio::spawn(async move {
        handle_child.should_terminate().await;
        flag.store(true, Ordering::Release);
    });
    handle
}

fn make_flag() -> Arc<AtomicBool> {
    Arc::new(AtomicBool::new(false))
}
