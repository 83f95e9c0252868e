//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::client::CollaboratorError;
use crate::command::Intent;
use crate::dispatch::{DispatchError, DispatchOutcome};
use crate::message::Sender;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(auto_speak: bool) -> SessionContext {
    SessionContext::new("test-session", auto_speak)
}

fn count_user_messages(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|e| {
            matches!(
                e,
                Effect::AppendMessage {
                    sender: Sender::User,
                    ..
                }
            )
        })
        .count()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::Idle),
        Just(SessionState::Listening),
        Just(SessionState::Processing),
        Just(SessionState::Speaking),
    ]
}

fn arb_busy_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![Just(SessionState::Processing), Just(SessionState::Speaking)]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{0,30}",
        Just("create issue".to_string()),
        Just("Please ADD COMMENT".to_string()),
        Just("code review".to_string()),
        Just("generate docs".to_string()),
        Just("   ".to_string()),
    ]
}

fn arb_submission() -> impl Strategy<Value = FormSubmission> {
    prop_oneof![
        ("[a-zA-Z ]{0,20}", "[a-zA-Z ]{0,20}")
            .prop_map(|(title, body)| FormSubmission::Issue { title, body }),
        (0u64..100, "[a-zA-Z ]{0,20}")
            .prop_map(|(issue_number, body)| FormSubmission::Comment { issue_number, body }),
        (0u64..100).prop_map(|pr_number| FormSubmission::Review { pr_number }),
    ]
}

fn arb_outcome() -> impl Strategy<Value = DispatchOutcome> {
    prop_oneof![
        Just(DispatchOutcome::OpenIssueForm),
        Just(DispatchOutcome::PromptAndSendComment),
        Just(DispatchOutcome::PromptAndRequestReview),
        Just(DispatchOutcome::ShowDocsMenu),
        "[a-zA-Z ]{1,30}".prop_map(DispatchOutcome::ChatReply),
        ("[a-zA-Z ]{1,20}", 1u64..500)
            .prop_map(|(title, number)| DispatchOutcome::IssueCreated { title, number }),
        (1u64..500).prop_map(|issue_number| DispatchOutcome::CommentAdded { issue_number }),
        (1u64..500).prop_map(|pr_number| DispatchOutcome::ReviewRequested { pr_number }),
    ]
}

fn arb_dispatch_error() -> impl Strategy<Value = DispatchError> {
    prop_oneof![
        prop_oneof![
            Just(Intent::CreateIssue),
            Just(Intent::AddComment),
            Just(Intent::RequestReview),
        ]
        .prop_map(|intent| DispatchError::PrerequisiteMissing { intent }),
        Just(DispatchError::RepositoryMissing),
        "[a-z ]{1,20}".prop_map(DispatchError::InvalidSubmission),
        "[a-z ]{1,20}".prop_map(|m| DispatchError::IssueFailed(CollaboratorError::server_error(m))),
        "[a-z ]{1,20}".prop_map(|m| DispatchError::CommentFailed(CollaboratorError::timeout(m))),
    ]
}

fn arb_dispatch_complete() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_outcome().prop_map(|o| Event::DispatchComplete { result: Ok(o) }),
        arb_dispatch_error().prop_map(|e| Event::DispatchComplete { result: Err(e) }),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::StartListening),
        Just(Event::StopListening),
        arb_text().prop_map(Event::typed),
        arb_text().prop_map(Event::voice),
        arb_submission().prop_map(|submission| Event::FormSubmitted { submission }),
        Just(Event::FormCancelled),
        "[a-z ]{0,20}".prop_map(|text| Event::InterimResult { text }),
        "[a-z-]{1,12}".prop_map(|reason| Event::SpeechError { reason }),
        Just(Event::SpeechStarted),
        Just(Event::SpeechEnded),
        arb_dispatch_complete(),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Effects never contradict the state they were produced for
    #[test]
    fn prop_effects_match_new_state(
        auto_speak in any::<bool>(),
        events in proptest::collection::vec(arb_event(), 0..30)
    ) {
        let ctx = test_context(auto_speak);
        let mut state = SessionState::Idle;

        for event in events {
            let Ok(result) = transition(&state, &ctx, event) else {
                continue;
            };
            for effect in &result.effects {
                match effect {
                    Effect::Dispatch { .. } | Effect::SubmitForm { .. } => {
                        prop_assert_eq!(result.new_state, SessionState::Processing);
                    }
                    Effect::Speak { .. } => {
                        prop_assert_eq!(result.new_state, SessionState::Speaking);
                    }
                    Effect::StartCapture => {
                        prop_assert_eq!(result.new_state, SessionState::Listening);
                    }
                    _ => {}
                }
            }
            state = result.new_state;
        }
    }

    // Speaking only ever finishes into Idle
    #[test]
    fn prop_processing_never_entered_from_speaking(event in arb_event()) {
        let ctx = test_context(true);
        if let Ok(result) = transition(&SessionState::Speaking, &ctx, event) {
            prop_assert_ne!(result.new_state, SessionState::Processing);
            prop_assert_ne!(result.new_state, SessionState::Listening);
        }
    }

    // Input during a turn is dropped without side effects
    #[test]
    fn prop_busy_rejects_input(
        state in arb_busy_state(),
        text in arb_text(),
        submission in arb_submission()
    ) {
        let ctx = test_context(false);

        let result = transition(&state, &ctx, Event::typed(text));
        prop_assert_eq!(result.unwrap_err(), TransitionError::Busy(state));

        let result = transition(&state, &ctx, Event::FormSubmitted { submission });
        prop_assert_eq!(result.unwrap_err(), TransitionError::Busy(state));
    }

    #[test]
    fn prop_start_listening_only_from_idle(state in arb_state()) {
        let ctx = test_context(false);
        let result = transition(&state, &ctx, Event::StartListening);
        if state == SessionState::Idle {
            let result = result.unwrap();
            prop_assert_eq!(result.new_state, SessionState::Listening);
            prop_assert_eq!(result.effects[0].clone(), Effect::StartCapture);
        } else {
            prop_assert_eq!(result.unwrap_err(), TransitionError::AlreadyActive(state));
        }
    }

    // Accepted input produces exactly one user message and one dispatch
    #[test]
    fn prop_accepted_input_dispatches_once(
        from_listening in any::<bool>(),
        text in "[a-zA-Z]{1,10}[a-zA-Z ]{0,20}"
    ) {
        let ctx = test_context(false);
        let state = if from_listening { SessionState::Listening } else { SessionState::Idle };
        let result = transition(&state, &ctx, Event::typed(text)).unwrap();

        prop_assert_eq!(result.new_state, SessionState::Processing);
        prop_assert_eq!(count_user_messages(&result.effects), 1);
        prop_assert_eq!(
            result.effects.iter().filter(|e| matches!(e, Effect::Dispatch { .. })).count(),
            1
        );
    }

    // Completion never adds a user message and always leaves the turn
    #[test]
    fn prop_completion_ends_turn(auto_speak in any::<bool>(), event in arb_dispatch_complete()) {
        let ctx = test_context(auto_speak);
        let result = transition(&SessionState::Processing, &ctx, event).unwrap();

        prop_assert_eq!(count_user_messages(&result.effects), 0);
        prop_assert!(matches!(result.new_state, SessionState::Idle | SessionState::Speaking));
        if result.new_state == SessionState::Speaking {
            prop_assert!(auto_speak);
        }
    }

    // A completion outside Processing is stale
    #[test]
    fn prop_stale_completion_rejected(state in arb_state(), event in arb_dispatch_complete()) {
        prop_assume!(state != SessionState::Processing);
        let ctx = test_context(false);
        let result = transition(&state, &ctx, event);
        prop_assert!(
            matches!(result, Err(TransitionError::InvalidTransition(_))),
            "expected invalid transition"
        );
    }
}
