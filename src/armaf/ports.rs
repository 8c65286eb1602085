//! Request/response ports used to talk to actors running in Tokio tasks.

use std::{fmt::Debug, result::Result};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};

/// Receives the outcome of a [Request].
type ResponseReceiver<R, E> = oneshot::Receiver<Result<R, E>>;

/// A message for an actor together with the channel its answer goes back on.
pub struct Request<P, R, E> {
    pub payload: P,
    pub response_sender: oneshot::Sender<Result<R, E>>,
}

impl<P, R, E> Request<P, R, E> {
    /// Wraps the payload into a [Request] and hands back the receiving end of
    /// its response channel.
    pub fn new(payload: P) -> (Request<P, R, E>, ResponseReceiver<R, E>) {
        let (response_sender, response_receiver) = oneshot::channel();
        (
            Request {
                payload,
                response_sender,
            },
            response_receiver,
        )
    }

    /// Answers the request. Fails only if the requester stopped waiting.
    pub fn respond(self, response: Result<R, E>) -> Result<(), Result<R, E>> {
        self.response_sender.send(response)
    }
}

/// Failure of a request/response exchange with an actor.
#[derive(Debug, Error, Clone)]
pub enum ActorRequestError<E: Debug> {
    #[error("actor is no longer accepting requests")]
    Send,

    #[error("actor dropped the request without answering")]
    Recv,

    #[error("actor rejected the request: {0:?}")]
    Actor(E),
}

/// The sending side of an actor's mailbox.
///
/// Ports are cheap to clone and an actor may be addressed from many places at
/// once, so actors must not rely on a particular ordering between different
/// requesters. Actors stop once every clone of their port is gone; there is no
/// dedicated stop message.
#[derive(Debug)]
pub struct ActorPort<P, R, E: Debug> {
    message_sender: mpsc::Sender<Request<P, R, E>>,
    shutdown_receiver: watch::Receiver<()>,
}

// Deriving Clone would require E: Clone, which anyhow::Error is not.
impl<P, R, E: Debug> Clone for ActorPort<P, R, E> {
    fn clone(&self) -> Self {
        Self {
            message_sender: self.message_sender.clone(),
            shutdown_receiver: self.shutdown_receiver.clone(),
        }
    }
}

impl<P, R, E: Debug> ActorPort<P, R, E> {
    /// Creates a connected port/receiver pair. The receiver is meant to be
    /// moved into the actor's task.
    pub fn make() -> (ActorPort<P, R, E>, ActorReceiver<P, R, E>) {
        let (message_sender, request_receiver) = mpsc::channel::<Request<P, R, E>>(8);
        let (shutdown_notifier, shutdown_receiver) = watch::channel(());
        (
            ActorPort {
                message_sender,
                shutdown_receiver,
            },
            ActorReceiver {
                request_receiver,
                _shutdown_notifier: shutdown_notifier,
            },
        )
    }

    /// Sends `payload` to the actor and waits for its answer.
    pub async fn request(&self, payload: P) -> Result<R, ActorRequestError<E>> {
        let (req, rx) = Request::new(payload);
        if self.message_sender.send(req).await.is_err() {
            return Err(ActorRequestError::Send);
        }
        match rx.await {
            Err(_) => Err(ActorRequestError::Recv),
            Ok(Ok(response)) => Ok(response),
            Ok(Err(actor_error)) => Err(ActorRequestError::Actor(actor_error)),
        }
    }

    /// Drops this port and waits until the actor has terminated, which
    /// happens once all other clones are gone too.
    pub async fn await_shutdown(self) {
        drop(self.message_sender);
        let mut shutdown_receiver = self.shutdown_receiver;
        // The sender half lives in the ActorReceiver, so an error here means
        // the actor is gone.
        let result = shutdown_receiver.changed().await;
        assert!(result.is_err());
    }
}

/// The actor's end of an [ActorPort].
///
/// Dropping it is what wakes up [ActorPort::await_shutdown], so it has to be
/// the last thing an actor releases.
#[derive(Debug)]
pub struct ActorReceiver<P, R, E: Debug> {
    pub request_receiver: mpsc::Receiver<Request<P, R, E>>,
    _shutdown_notifier: watch::Sender<()>,
}

impl<P, R, E: Debug> ActorReceiver<P, R, E> {
    /// Next request, or `None` once every port has been dropped.
    pub async fn recv(&mut self) -> Option<Request<P, R, E>> {
        self.request_receiver.recv().await
    }
}

/// Lifecycle handle for tasks that take no requests, such as sensors.
///
/// The owner keeps the [Handle]; the task keeps the [HandleChild] and stops
/// once the handle is dropped or [Handle::await_shutdown] is called.
pub struct Handle(ActorPort<(), (), ()>);

impl Handle {
    pub fn new() -> (Handle, HandleChild) {
        let (port, receiver) = ActorPort::make();
        (Handle(port), HandleChild(receiver))
    }

    /// Signals the task to stop and waits until it has.
    pub async fn await_shutdown(self) {
        self.0.await_shutdown().await
    }
}

/// The task's side of a [Handle].
pub struct HandleChild(ActorReceiver<(), (), ()>);

impl HandleChild {
    /// Resolves once the owning [Handle] is gone. Meant for use inside
    /// [tokio::select!].
    pub async fn should_terminate(&mut self) {
        let res = self.0.recv().await;
        assert!(res.is_none());
    }
}
