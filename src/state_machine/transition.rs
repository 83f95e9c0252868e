//! Pure state transition function

use super::{Effect, Event, PendingAction, SessionContext, SessionState};
use crate::command::{match_intent, InputSource, Utterance};
use crate::dispatch::{DispatchError, DispatchOutcome};
use thiserror::Error;

pub const STATUS_READY: &str = "Ready to listen to your thoughts...";
pub const STATUS_LISTENING: &str = "Listening to your thoughts...";
pub const STATUS_THINKING: &str = "Thinking...";
pub const STATUS_SPEAKING: &str = "Speaking response...";
pub const STATUS_HEARING_PREFIX: &str = "Hearing: ";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Session is busy ({0}), input dropped")]
    Busy(SessionState),
    #[error("Voice capture cannot start while {0}")]
    AlreadyActive(SessionState),
    #[error("Empty utterance, nothing to dispatch")]
    EmptyUtterance,
    #[error("Voice result arrived after capture ended")]
    CaptureEnded,
    #[error("No {0:?} is pending")]
    NoPendingAction(PendingAction),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

impl TransitionError {
    /// Dropped input that is never surfaced to the user
    pub fn is_input_ignored(&self) -> bool {
        matches!(
            self,
            Self::Busy(_)
                | Self::AlreadyActive(_)
                | Self::EmptyUtterance
                | Self::CaptureEnded
                | Self::NoPendingAction(_)
        )
    }
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (*state, event) {
        // ============================================================
        // Voice capture
        // ============================================================
        (SessionState::Idle, Event::StartListening) => {
            Ok(TransitionResult::new(SessionState::Listening)
                .with_effect(Effect::StartCapture)
                .with_effect(Effect::status(STATUS_LISTENING)))
        }

        // A second start is a no-op, never a restart
        (current, Event::StartListening) => Err(TransitionError::AlreadyActive(current)),

        (SessionState::Listening, Event::StopListening) => Ok(TransitionResult::new(
            SessionState::Idle,
        )
        .with_effect(Effect::StopCapture)
        .with_effect(Effect::status(STATUS_READY))),

        (SessionState::Listening, Event::InterimResult { text }) => {
            Ok(TransitionResult::new(SessionState::Listening)
                .with_effect(Effect::status(format!("{STATUS_HEARING_PREFIX}\"{text}\""))))
        }

        // ============================================================
        // Input
        // ============================================================
        // Recognizers deliver a final result after stop(); capture is already closed
        (SessionState::Idle, Event::UtteranceReceived { utterance })
            if utterance.source() == InputSource::Voice =>
        {
            Err(TransitionError::CaptureEnded)
        }

        (current @ (SessionState::Idle | SessionState::Listening), Event::UtteranceReceived { utterance }) => {
            accept_utterance(current, &utterance)
        }

        (current @ (SessionState::Processing | SessionState::Speaking), Event::UtteranceReceived { .. })
        | (current @ (SessionState::Processing | SessionState::Speaking), Event::FormSubmitted { .. }) => {
            Err(TransitionError::Busy(current))
        }

        (SessionState::Idle, Event::FormSubmitted { submission }) => {
            Ok(TransitionResult::new(SessionState::Processing)
                .with_effect(Effect::status(STATUS_THINKING))
                .with_effect(Effect::SubmitForm { submission }))
        }

        // Submitting a form while the microphone is open closes it
        (SessionState::Listening, Event::FormSubmitted { submission }) => {
            Ok(TransitionResult::new(SessionState::Processing)
                .with_effect(Effect::StopCapture)
                .with_effect(Effect::status(STATUS_THINKING))
                .with_effect(Effect::SubmitForm { submission }))
        }

        // Closing a form never touches the turn in progress
        (current, Event::FormCancelled) => Ok(TransitionResult::new(current)
            .with_effect(Effect::SetPendingAction { action: None })),

        // ============================================================
        // Dispatch completion
        // ============================================================
        (SessionState::Processing, Event::DispatchComplete { result }) => {
            Ok(complete_turn(context, &result))
        }

        // ============================================================
        // Speech output
        // ============================================================
        (SessionState::Speaking, Event::SpeechStarted) => Ok(TransitionResult::new(
            SessionState::Speaking,
        )
        .with_effect(Effect::status(STATUS_SPEAKING))),

        (SessionState::Speaking, Event::SpeechEnded) => Ok(TransitionResult::new(
            SessionState::Idle,
        )
        .with_effect(Effect::status(STATUS_READY))),

        // ============================================================
        // Speech provider failures
        // ============================================================

        // A dispatch is in flight; report but keep the busy guard up
        (SessionState::Processing, Event::SpeechError { reason }) => {
            Ok(TransitionResult::new(SessionState::Processing)
                .with_effect(Effect::status(voice_error_status(&reason))))
        }

        (_, Event::SpeechError { reason }) => Ok(TransitionResult::new(SessionState::Idle)
            .with_effect(Effect::status(voice_error_status(&reason)))),

        // ============================================================
        // Everything else is stale or out of order
        // ============================================================
        (current, event) => Err(TransitionError::InvalidTransition(format!(
            "{} while {current}",
            event.name()
        ))),
    }
}

fn accept_utterance(
    current: SessionState,
    utterance: &Utterance,
) -> Result<TransitionResult, TransitionError> {
    let normalized = utterance.normalized();

    if normalized.is_empty() {
        // An empty final voice result means the recognizer already stopped
        return if utterance.source() == InputSource::Voice {
            Ok(TransitionResult::new(SessionState::Idle).with_effect(Effect::status(STATUS_READY)))
        } else {
            Err(TransitionError::EmptyUtterance)
        };
    }

    let intent = match_intent(&normalized);
    let text = utterance.text().trim().to_string();

    let mut result = TransitionResult::new(SessionState::Processing);
    // Typing while the microphone is open closes it
    if current == SessionState::Listening && utterance.source() == InputSource::Typed {
        result = result.with_effect(Effect::StopCapture);
    }

    Ok(result.with_effects([
        Effect::user_message(text.clone()),
        Effect::status(STATUS_THINKING),
        Effect::Dispatch { intent, text },
    ]))
}

fn complete_turn(
    context: &SessionContext,
    result: &Result<DispatchOutcome, DispatchError>,
) -> TransitionResult {
    let mut effects = Vec::new();

    let reply = match result {
        Ok(outcome) => {
            effects.push(Effect::SetPendingAction {
                action: outcome.pending_action(),
            });
            outcome.reply_text()
        }
        Err(error) => {
            // A failed submission keeps its form open for another try
            if !error.retains_pending_action() {
                effects.push(Effect::SetPendingAction { action: None });
            }
            Some(error.to_string())
        }
    };

    match reply {
        Some(text) if context.auto_speak => {
            effects.push(Effect::assistant_message(text.clone()));
            TransitionResult::new(SessionState::Speaking)
                .with_effects(effects)
                .with_effect(Effect::Speak { text })
        }
        Some(text) => {
            effects.push(Effect::assistant_message(text));
            TransitionResult::new(SessionState::Idle)
                .with_effects(effects)
                .with_effect(Effect::status(STATUS_READY))
        }
        None => TransitionResult::new(SessionState::Idle)
            .with_effects(effects)
            .with_effect(Effect::status(STATUS_READY)),
    }
}

fn voice_error_status(reason: &str) -> String {
    format!("Voice error: {reason}. Try typing instead.")
}
