//! Session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the transition function only computes the next state and the effects to
//! run, and the session runtime performs the I/O.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{Event, FormSubmission};
pub use state::{PendingAction, SessionContext, SessionState};
pub use transition::{transition, TransitionError, TransitionResult};
pub use transition::{
    STATUS_HEARING_PREFIX, STATUS_LISTENING, STATUS_READY, STATUS_SPEAKING, STATUS_THINKING,
};
