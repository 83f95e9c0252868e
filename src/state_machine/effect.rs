//! Effects produced by state transitions

use super::event::FormSubmission;
use super::state::PendingAction;
use crate::command::Intent;
use crate::message::Sender;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the speech provider to start capturing
    StartCapture,

    /// Ask the speech provider to stop capturing
    StopCapture,

    /// Append to the session's message log
    AppendMessage { sender: Sender, text: String },

    /// Show a status line
    UpdateStatus { text: String },

    /// Run the dispatcher for a matched intent (spawns as background task)
    Dispatch { intent: Intent, text: String },

    /// Complete a pending action (spawns as background task)
    SubmitForm { submission: FormSubmission },

    /// Replace the pending action
    SetPendingAction { action: Option<PendingAction> },

    /// Read text aloud
    Speak { text: String },
}

impl Effect {
    pub fn status(text: impl Into<String>) -> Self {
        Effect::UpdateStatus { text: text.into() }
    }

    pub fn user_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn assistant_message(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }
}
