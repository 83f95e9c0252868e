//! Events that can occur in a session

use super::state::PendingAction;
use crate::command::Utterance;
use crate::dispatch::{DispatchError, DispatchOutcome};
use serde::{Deserialize, Serialize};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    StartListening,
    StopListening,
    UtteranceReceived {
        utterance: Utterance,
    },
    FormSubmitted {
        submission: FormSubmission,
    },
    /// The front end closed the form or prompt
    FormCancelled,

    // Speech provider events
    InterimResult {
        text: String,
    },
    SpeechError {
        reason: String,
    },
    SpeechStarted,
    SpeechEnded,

    // Dispatcher events
    DispatchComplete {
        result: Result<DispatchOutcome, DispatchError>,
    },
}

impl Event {
    /// Shorthand for a typed utterance
    pub fn typed(text: impl Into<String>) -> Self {
        Event::UtteranceReceived {
            utterance: Utterance::typed(text),
        }
    }

    /// Shorthand for a final voice recognition result
    pub fn voice(text: impl Into<String>) -> Self {
        Event::UtteranceReceived {
            utterance: Utterance::voice(text),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::StartListening => "start_listening",
            Event::StopListening => "stop_listening",
            Event::UtteranceReceived { .. } => "utterance_received",
            Event::FormSubmitted { .. } => "form_submitted",
            Event::FormCancelled => "form_cancelled",
            Event::InterimResult { .. } => "interim_result",
            Event::SpeechError { .. } => "speech_error",
            Event::SpeechStarted => "speech_started",
            Event::SpeechEnded => "speech_ended",
            Event::DispatchComplete { .. } => "dispatch_complete",
        }
    }
}

/// Data the front end collected for a pending action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormSubmission {
    Issue { title: String, body: String },
    Comment { issue_number: u64, body: String },
    Review { pr_number: u64 },
}

impl FormSubmission {
    /// The pending action this submission completes
    pub fn action(&self) -> PendingAction {
        match self {
            FormSubmission::Issue { .. } => PendingAction::IssueForm,
            FormSubmission::Comment { .. } => PendingAction::CommentPrompt,
            FormSubmission::Review { .. } => PendingAction::ReviewPrompt,
        }
    }
}
