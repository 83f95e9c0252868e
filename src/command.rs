//! Turning raw input text into an intent
//!
//! Normalization first, then an ordered phrase table where the first
//! matching row wins.

mod intent;
mod utterance;

#[cfg(test)]
mod proptests;

pub use intent::{match_intent, Intent};
pub use utterance::{normalize, InputSource, Utterance};
