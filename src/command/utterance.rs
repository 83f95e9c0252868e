//! Raw user input and its normalized form

use serde::{Deserialize, Serialize};

/// Where an utterance came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Voice,
    Typed,
}

/// A single piece of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    text: String,
    source: InputSource,
}

impl Utterance {
    pub fn new(text: impl Into<String>, source: InputSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    pub fn voice(text: impl Into<String>) -> Self {
        Self::new(text, InputSource::Voice)
    }

    pub fn typed(text: impl Into<String>) -> Self {
        Self::new(text, InputSource::Typed)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    /// Normalized text used for intent matching
    pub fn normalized(&self) -> String {
        normalize(&self.text)
    }
}

/// Trim surrounding whitespace and lowercase ASCII letters.
///
/// An empty result means there is nothing to dispatch.
pub fn normalize(text: &str) -> String {
    text.trim().to_ascii_lowercase()
}
