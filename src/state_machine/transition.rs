//! Pure state transition function

use super::{BestEffort, Effect, Event, Operation, SessionState};
use super::state::AskStatus;
use crate::api::HISTORY_LIMIT;
use thiserror::Error;

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
}

/// Events rejected without any state change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Question is empty")]
    EmptyQuestion,
    #[error("An answer is already being fetched")]
    AskInFlight,
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// Every request effect carries a sequence token. Ask completions and
/// history fetches are committed only when their token is still the latest
/// issued; a confirmed clear always empties the history.
pub fn transition(
    state: &SessionState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::DraftChanged { text } => {
            let mut next = state.clone();
            next.draft = text;
            Ok(TransitionResult::new(next))
        }

        // ============================================================
        // Ask
        // ============================================================

        Event::Ask { question } => {
            if question.trim().is_empty() {
                return Err(TransitionError::EmptyQuestion);
            }
            if state.is_loading() {
                return Err(TransitionError::AskInFlight);
            }

            let mut next = state.clone();
            next.ask_seq += 1;
            next.status = AskStatus::Loading { seq: next.ask_seq };
            next.answer_revision += 1;

            let seq = next.ask_seq;
            Ok(TransitionResult::new(next).with_effect(Effect::SubmitAsk { seq, question }))
        }

        Event::AskCompleted { seq, result } => {
            let current = matches!(state.status, AskStatus::Loading { seq: s } if s == seq);
            if !current || seq != state.ask_seq {
                return Ok(TransitionResult::new(state.clone()).with_effect(Effect::DropStale {
                    operation: Operation::Ask,
                    seq,
                }));
            }

            let mut next = state.clone();
            match result {
                Ok(answer) => {
                    next.status = AskStatus::Answered(answer);
                    next.answer_revision += 1;
                    next.draft.clear();
                    // Dependent follow-up, only after the answer is committed
                    next.history_seq += 1;
                    let history_seq = next.history_seq;
                    Ok(TransitionResult::new(next).with_effect(Effect::FetchHistory {
                        seq: history_seq,
                        limit: HISTORY_LIMIT,
                    }))
                }
                Err(error) => {
                    next.status = AskStatus::Errored {
                        message: error.to_string(),
                    };
                    Ok(TransitionResult::new(next))
                }
            }
        }

        // ============================================================
        // History
        // ============================================================

        Event::RefreshHistory => {
            let mut next = state.clone();
            next.history_seq += 1;
            let seq = next.history_seq;
            Ok(TransitionResult::new(next).with_effect(Effect::FetchHistory {
                seq,
                limit: HISTORY_LIMIT,
            }))
        }

        Event::ClearHistory => {
            let mut next = state.clone();
            next.history_seq += 1;
            let seq = next.history_seq;
            Ok(TransitionResult::new(next).with_effect(Effect::ClearHistory { seq }))
        }

        Event::HistoryFetched { seq, outcome } => match outcome {
            BestEffort::Discarded(error) => {
                Ok(TransitionResult::new(state.clone()).with_effect(Effect::DiscardFailure {
                    operation: Operation::RefreshHistory,
                    error,
                }))
            }
            BestEffort::Succeeded(_) if seq != state.history_seq => {
                Ok(TransitionResult::new(state.clone()).with_effect(Effect::DropStale {
                    operation: Operation::RefreshHistory,
                    seq,
                }))
            }
            BestEffort::Succeeded(mut items) => {
                items.truncate(HISTORY_LIMIT);
                let mut next = state.clone();
                next.history = items;
                Ok(TransitionResult::new(next))
            }
        },

        Event::HistoryCleared { outcome } => match outcome {
            BestEffort::Discarded(error) => {
                Ok(TransitionResult::new(state.clone()).with_effect(Effect::DiscardFailure {
                    operation: Operation::ClearHistory,
                    error,
                }))
            }
            // The server has already deleted its log, so a confirmed clear
            // applies even when a newer history request is outstanding
            BestEffort::Succeeded(()) => {
                let mut next = state.clone();
                next.history.clear();
                Ok(TransitionResult::new(next))
            }
        },
    }
}
