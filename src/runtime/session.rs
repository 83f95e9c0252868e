//! Session executor

use super::traits::{EventSink, SpeechProvider, VoiceSettings};
use super::{SessionHandle, SessionUpdate};
use crate::client::{ChatClient, GitHubApi};
use crate::config::SessionConfig;
use crate::context::RepoContext;
use crate::dispatch::Dispatcher;
use crate::message::{Message, MessageLog};
use crate::state_machine::{
    transition, Effect, Event, PendingAction, SessionContext, SessionState, TransitionError,
    STATUS_READY,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

const EVENT_CHANNEL_CAPACITY: usize = 32;
const UPDATE_CHANNEL_CAPACITY: usize = 128;

/// A single conversational session.
///
/// Only one turn is ever in flight: dispatches run as background tasks and
/// report back through the session's own event channel, so input arriving
/// in the meantime meets the busy guard and is dropped.
pub struct Session<C, G, S>
where
    C: ChatClient + 'static,
    G: GitHubApi + 'static,
    S: SpeechProvider,
{
    context: SessionContext,
    repo: RepoContext,
    voice: VoiceSettings,
    state: SessionState,
    messages: MessageLog,
    pending: Option<PendingAction>,
    status: String,
    dispatcher: Arc<Dispatcher<C, G>>,
    speech: S,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so that `run` ends once every handle is gone
    event_tx: mpsc::WeakSender<Event>,
    updates_tx: broadcast::Sender<SessionUpdate>,
}

impl<C, G, S> Session<C, G, S>
where
    C: ChatClient + 'static,
    G: GitHubApi + 'static,
    S: SpeechProvider,
{
    pub fn new(
        config: &SessionConfig,
        repo: RepoContext,
        dispatcher: Dispatcher<C, G>,
        speech: S,
    ) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (updates_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        let session_id = uuid::Uuid::new_v4().to_string();
        let mut messages = MessageLog::new();
        if let Some(greeting) = &config.greeting {
            messages.push(Message::new(crate::message::Sender::Assistant, greeting.clone()));
        }

        tracing::info!(
            session_id = %session_id,
            connection = %repo.describe(),
            auto_speak = config.auto_speak,
            "Session created"
        );

        let session = Self {
            context: SessionContext::new(session_id, config.auto_speak),
            repo,
            voice: config.voice.clone(),
            state: SessionState::Idle,
            messages,
            pending: None,
            status: STATUS_READY.to_string(),
            dispatcher: Arc::new(dispatcher),
            speech,
            event_rx,
            event_tx: event_tx.downgrade(),
            updates_tx: updates_tx.clone(),
        };
        let handle = SessionHandle {
            event_tx,
            updates_tx,
        };
        (session, handle)
    }

    pub fn id(&self) -> &str {
        &self.context.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn messages(&self) -> &[Message] {
        self.messages.as_slice()
    }

    pub fn pending_action(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn repo_context(&self) -> &RepoContext {
        &self.repo
    }

    /// Process events until every handle has been dropped
    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session");
        while self.step().await {}
        tracing::info!(session_id = %self.context.session_id, "Session stopped");
    }

    /// Wait for the next event and process it. Returns `false` once the
    /// channel is closed.
    pub async fn step(&mut self) -> bool {
        match self.event_rx.recv().await {
            Some(event) => {
                // Rejections are already logged
                let _ = self.process_event(event).await;
                true
            }
            None => false,
        }
    }

    /// Run one event through the state machine and execute its effects
    pub async fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            if let Event::FormSubmitted { submission } = &current_event {
                let action = submission.action();
                if self.pending != Some(action) {
                    let error = TransitionError::NoPendingAction(action);
                    tracing::debug!(error = %error, "Input ignored");
                    return Err(error);
                }
            }

            let event_name = current_event.name();
            let result = match transition(&self.state, &self.context, current_event) {
                Ok(r) => r,
                Err(e) => {
                    if e.is_input_ignored() {
                        tracing::debug!(error = %e, event = event_name, "Input ignored");
                    } else {
                        tracing::warn!(error = %e, event = event_name, "Rejected event");
                    }
                    return Err(e);
                }
            };

            if result.new_state != self.state {
                tracing::debug!(
                    session_id = %self.context.session_id,
                    from = %self.state,
                    to = %result.new_state,
                    event = event_name,
                    "State change"
                );
                self.state = result.new_state;
                self.broadcast(SessionUpdate::StateChange { state: self.state });
            }

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }

        Ok(())
    }

    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::StartCapture => {
                let sink = self.sink()?;
                self.speech.start_listening(sink).err().map(|e| {
                    tracing::warn!(error = %e, "Failed to start voice capture");
                    Event::SpeechError {
                        reason: e.to_string(),
                    }
                })
            }

            Effect::StopCapture => {
                if let Err(e) = self.speech.stop_listening() {
                    tracing::warn!(error = %e, "Failed to stop voice capture");
                }
                None
            }

            Effect::AppendMessage { sender, text } => {
                let message = self.messages.push(Message::new(sender, text)).clone();
                self.broadcast(SessionUpdate::Message { message });
                None
            }

            Effect::UpdateStatus { text } => {
                self.status.clone_from(&text);
                self.broadcast(SessionUpdate::Status { text });
                None
            }

            Effect::SetPendingAction { action } => {
                if self.pending != action {
                    self.pending = action;
                    self.broadcast(SessionUpdate::PendingAction { action });
                }
                None
            }

            Effect::Dispatch { intent, text } => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    intent = %intent,
                    "Dispatching utterance"
                );
                let dispatcher = Arc::clone(&self.dispatcher);
                let repo = self.repo.clone();
                self.spawn_turn(async move { dispatcher.dispatch(intent, &text, &repo).await })
                    .await
            }

            Effect::SubmitForm { submission } => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    action = ?submission.action(),
                    "Submitting form"
                );
                let dispatcher = Arc::clone(&self.dispatcher);
                let repo = self.repo.clone();
                self.spawn_turn(async move { dispatcher.submit(&submission, &repo).await })
                    .await
            }

            Effect::Speak { text } => {
                let sink = self.sink()?;
                self.speech.speak(&text, &self.voice, sink).err().map(|e| {
                    tracing::warn!(error = %e, "Failed to speak reply");
                    Event::SpeechError {
                        reason: e.to_string(),
                    }
                })
            }
        }
    }

    /// Run a dispatch in the background and feed its completion back in.
    ///
    /// Without a live sender nobody can observe the session any more, so the
    /// turn is completed inline instead.
    async fn spawn_turn<F>(&self, turn: F) -> Option<Event>
    where
        F: std::future::Future<
                Output = Result<crate::dispatch::DispatchOutcome, crate::dispatch::DispatchError>,
            > + Send
            + 'static,
    {
        match self.event_tx.upgrade() {
            Some(tx) => {
                tokio::spawn(async move {
                    let result = turn.await;
                    if tx.send(Event::DispatchComplete { result }).await.is_err() {
                        tracing::debug!("Session closed before dispatch completed");
                    }
                });
                None
            }
            None => Some(Event::DispatchComplete { result: turn.await }),
        }
    }

    fn sink(&self) -> Option<EventSink> {
        self.event_tx.upgrade().map(EventSink::new)
    }

    fn broadcast(&self, update: SessionUpdate) {
        // No subscribers is fine
        let _ = self.updates_tx.send(update);
    }
}
