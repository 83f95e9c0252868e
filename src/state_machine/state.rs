//! Session state types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the session is in a turn.
///
/// `Idle` is the only rest state; every path eventually returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    /// Voice capture is active
    Listening,
    /// An intent was matched and its dispatch is in flight
    Processing,
    /// The reply is being read aloud
    Speaking,
}

impl SessionState {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Input is accepted only while idle or listening
    pub fn accepts_input(self) -> bool {
        matches!(self, Self::Idle | Self::Listening)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Processing => "processing",
            Self::Speaking => "speaking",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A follow-up the front end must complete (a form or a prompt)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    IssueForm,
    CommentPrompt,
    ReviewPrompt,
}

/// Per-session settings the transition function reads
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    /// Read replies aloud when a turn completes
    pub auto_speak: bool,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, auto_speak: bool) -> Self {
        Self {
            session_id: session_id.into(),
            auto_speak,
        }
    }
}
