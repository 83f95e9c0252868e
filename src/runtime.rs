//! Runtime for a single conversational session
//!
//! A `Session` owns the state machine, the message log, and the repository
//! context. Front ends talk to it through a cloneable `SessionHandle` and
//! observe it through `SessionUpdate` broadcasts.

mod session;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use session::Session;
pub use traits::{EventSink, SpeechError, SpeechProvider, TextOnlySpeech, VoiceSettings};

use crate::message::Message;
use crate::state_machine::{Event, FormSubmission, PendingAction, SessionState};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

/// Updates sent to front ends
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    StateChange { state: SessionState },
    Message { message: Message },
    Status { text: String },
    PendingAction { action: Option<PendingAction> },
}

/// The session has stopped and no longer accepts events
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("session closed")]
pub struct SessionClosed;

/// Handle to interact with a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    updates_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    pub async fn send(&self, event: Event) -> Result<(), SessionClosed> {
        self.event_tx.send(event).await.map_err(|_| SessionClosed)
    }

    pub async fn start_listening(&self) -> Result<(), SessionClosed> {
        self.send(Event::StartListening).await
    }

    pub async fn stop_listening(&self) -> Result<(), SessionClosed> {
        self.send(Event::StopListening).await
    }

    /// Send typed input; blank text is dropped by the session
    pub async fn submit_text(&self, text: impl Into<String>) -> Result<(), SessionClosed> {
        self.send(Event::typed(text)).await
    }

    pub async fn submit_form(&self, submission: FormSubmission) -> Result<(), SessionClosed> {
        self.send(Event::FormSubmitted { submission }).await
    }

    pub async fn cancel_form(&self) -> Result<(), SessionClosed> {
        self.send(Event::FormCancelled).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates_tx.subscribe()
    }
}
