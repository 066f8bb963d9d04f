//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::api::{AnswerResult, HistoryItem, Source, HISTORY_LIMIT};
use crate::transport::TransportError;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_source() -> impl Strategy<Value = Source> {
    prop_oneof![Just(Source::Kb), Just(Source::Llm)]
}

fn arb_answer() -> impl Strategy<Value = AnswerResult> {
    (
        "[a-zA-Z ]{1,30}",
        arb_source(),
        proptest::option::of("[a-zA-Z ?]{1,30}"),
        proptest::option::of(0.0f64..=1.0),
        proptest::option::of(proptest::collection::vec("[a-z ]{1,20}", 0..4)),
    )
        .prop_map(|(answer, source, matched_question, score, trace)| AnswerResult {
            answer,
            source,
            matched_question,
            score,
            trace,
        })
}

fn arb_history_item() -> impl Strategy<Value = HistoryItem> {
    (0i64..2_000_000_000, "[a-z ?]{1,20}", "[a-z ]{1,20}", arb_source()).prop_map(
        |(timestamp, question, answer, source)| HistoryItem {
            timestamp,
            question,
            answer,
            source: source.as_str().to_string(),
        },
    )
}

fn arb_transport_error() -> impl Strategy<Value = TransportError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(TransportError::Network),
        (400u16..600).prop_map(TransportError::http),
        "[a-z ]{1,20}".prop_map(TransportError::MalformedResponse),
    ]
}

fn arb_question() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ?]{1,30}",
        Just(String::new()),
        "[ \t]{1,4}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_question().prop_map(|text| Event::DraftChanged { text }),
        arb_question().prop_map(|question| Event::Ask { question }),
        Just(Event::RefreshHistory),
        Just(Event::ClearHistory),
        (0u64..6, prop_oneof![
            arb_answer().prop_map(Ok::<AnswerResult, TransportError>),
            arb_transport_error().prop_map(Err::<AnswerResult, TransportError>),
        ])
            .prop_map(|(seq, result)| Event::AskCompleted { seq, result }),
        (0u64..6, prop_oneof![
            proptest::collection::vec(arb_history_item(), 0..20).prop_map(BestEffort::Succeeded),
            arb_transport_error().prop_map(BestEffort::<Vec<HistoryItem>>::Discarded),
        ])
            .prop_map(|(seq, outcome)| Event::HistoryFetched { seq, outcome }),
        prop_oneof![
            Just(BestEffort::Succeeded(())),
            arb_transport_error().prop_map(BestEffort::<()>::Discarded),
        ]
            .prop_map(|outcome| Event::HistoryCleared { outcome }),
    ]
}

// ============================================================================
// Helpers
// ============================================================================

fn check_invariants(state: &SessionState) -> Result<(), TestCaseError> {
    prop_assert!(state.history().len() <= HISTORY_LIMIT);
    prop_assert!(!(state.answer().is_some() && state.error().is_some()));
    if state.is_loading() {
        prop_assert!(state.answer().is_none());
        prop_assert!(state.error().is_none());
    }
    Ok(())
}

fn is_history_event(event: &Event) -> bool {
    matches!(
        event,
        Event::RefreshHistory
            | Event::ClearHistory
            | Event::HistoryFetched { .. }
            | Event::HistoryCleared { .. }
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn invariants_hold_over_any_sequence(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut state = SessionState::default();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
            check_invariants(&state)?;
        }
    }

    #[test]
    fn rejected_events_are_pure_no_ops(
        events in proptest::collection::vec(arb_event(), 0..20),
        question in arb_question(),
    ) {
        let mut state = SessionState::default();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
        }

        let before = state.clone();
        match transition(&state, Event::Ask { question: question.clone() }) {
            Err(TransitionError::EmptyQuestion) => prop_assert!(question.trim().is_empty()),
            Err(TransitionError::AskInFlight) => prop_assert!(before.is_loading()),
            Ok(result) => {
                prop_assert!(!question.trim().is_empty());
                prop_assert!(result.new_state.is_loading());
                prop_assert_eq!(result.effects.len(), 1);
            }
        }
        prop_assert_eq!(state, before);
    }

    #[test]
    fn history_events_never_touch_draft_or_status(
        events in proptest::collection::vec(arb_event(), 0..30),
    ) {
        let mut state = SessionState::default();
        for event in events {
            let history_event = is_history_event(&event);
            let before = state.clone();
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
            if history_event {
                prop_assert_eq!(state.draft(), before.draft());
                prop_assert_eq!(state.status(), before.status());
            } else {
                prop_assert_eq!(state.history(), before.history());
            }
        }
    }

    #[test]
    fn draft_clears_only_on_committed_answer(
        events in proptest::collection::vec(arb_event(), 0..30),
    ) {
        let mut state = SessionState::default();
        for event in events {
            let edits_draft = matches!(event, Event::DraftChanged { .. });
            let before = state.clone();
            if let Ok(result) = transition(&state, event) {
                state = result.new_state;
            }
            if !edits_draft && state.draft() != before.draft() {
                prop_assert_eq!(state.draft(), "");
                prop_assert!(before.is_loading());
                prop_assert!(state.answer().is_some());
            }
        }
    }

    #[test]
    fn request_effects_carry_latest_token(
        events in proptest::collection::vec(arb_event(), 0..30),
    ) {
        let mut state = SessionState::default();
        for event in events {
            if let Ok(result) = transition(&state, event) {
                for effect in &result.effects {
                    match effect {
                        Effect::SubmitAsk { seq, .. } => {
                            prop_assert_eq!(*seq, result.new_state.ask_seq());
                        }
                        Effect::FetchHistory { seq, limit } => {
                            prop_assert_eq!(*seq, result.new_state.history_seq());
                            prop_assert_eq!(*limit, HISTORY_LIMIT);
                        }
                        Effect::ClearHistory { seq } => {
                            prop_assert_eq!(*seq, result.new_state.history_seq());
                        }
                        Effect::DiscardFailure { .. } | Effect::DropStale { .. } => {
                            prop_assert_eq!(&result.new_state, &state);
                        }
                    }
                }
                prop_assert!(result.effects.iter().filter(|e| e.is_request()).count() <= 1);
                state = result.new_state;
            }
        }
    }

    #[test]
    fn current_ask_completion_always_ends_loading(
        question in "[a-zA-Z?][a-zA-Z ?]{0,29}",
        result in prop_oneof![
            arb_answer().prop_map(Ok::<AnswerResult, TransportError>),
            arb_transport_error().prop_map(Err::<AnswerResult, TransportError>),
        ],
    ) {
        let started = transition(&SessionState::default(), Event::Ask { question })
            .map_err(|e| TestCaseError::fail(e.to_string()))?
            .new_state;
        let succeeded = result.is_ok();

        let done = transition(&started, Event::AskCompleted { seq: started.ask_seq(), result })
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert!(!done.new_state.is_loading());
        prop_assert_eq!(done.new_state.answer().is_some(), succeeded);
        prop_assert_eq!(done.new_state.error().is_some(), !succeeded);
        // A history refresh follows only a successful ask
        prop_assert_eq!(
            done.effects.iter().any(|e| matches!(e, Effect::FetchHistory { .. })),
            succeeded
        );
    }
}
