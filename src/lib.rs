//! Thought Chat - a voice and text conversational command router
//!
//! Utterances are normalized, matched to an intent, and dispatched to a
//! chat collaborator or to GitHub issue/comment actions. A `Session` drives
//! one conversation through an explicit state machine; the `server` module
//! is the GitHub App backend the sessions talk to.

pub mod client;
pub mod command;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod message;
pub mod runtime;
pub mod server;
pub mod state_machine;
