//! Event handler doubles.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::events::{Event, EventCategory, EventHandler, HandlerError};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Forwards every handled event to a channel.
pub struct ChannelHandler {
    sender: Mutex<Sender<Event>>,
}

impl ChannelHandler {
    pub fn new() -> (Arc<Self>, Receiver<Event>) {
        let (sender, receiver) = mpsc::channel();
        (
            Arc::new(Self {
                sender: Mutex::new(sender),
            }),
            receiver,
        )
    }
}

impl EventHandler for ChannelHandler {
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self.sender
            .lock()
            .expect("sender lock")
            .send(event.clone())
            .map_err(|error| HandlerError::failed(event.category, error.to_string()))
    }
}

/// Always fails.
pub struct FailingHandler;

impl EventHandler for FailingHandler {
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        Err(HandlerError::failed(event.category, "handler refused event"))
    }
}

/// Always panics.
pub struct PanickingHandler;

impl EventHandler for PanickingHandler {
    fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
        panic!("handler exploded");
    }
}

/// Blocks until released, signalling when it has started.
pub struct GatedHandler {
    started: Mutex<Sender<EventCategory>>,
    release: Mutex<Receiver<()>>,
}

impl GatedHandler {
    /// Returns the handler, a receiver signalled on entry, and the release
    /// sender.
    pub fn new() -> (Arc<Self>, Receiver<EventCategory>, Sender<()>) {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        (
            Arc::new(Self {
                started: Mutex::new(started_tx),
                release: Mutex::new(release_rx),
            }),
            started_rx,
            release_tx,
        )
    }
}

impl EventHandler for GatedHandler {
    fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        self.started
            .lock()
            .expect("started lock")
            .send(event.category)
            .map_err(|error| HandlerError::failed(event.category, error.to_string()))?;
        self.release
            .lock()
            .expect("release lock")
            .recv_timeout(RECV_TIMEOUT)
            .map_err(|error| HandlerError::failed(event.category, error.to_string()))
    }
}
