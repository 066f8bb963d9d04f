//! Events that drive the session

use crate::api::{AnswerResult, HistoryItem};
use crate::transport::TransportError;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    DraftChanged {
        text: String,
    },
    Ask {
        question: String,
    },
    RefreshHistory,
    ClearHistory,

    // Completion events, one per issued request
    AskCompleted {
        seq: u64,
        result: Result<AnswerResult, TransportError>,
    },
    HistoryFetched {
        seq: u64,
        outcome: BestEffort<Vec<HistoryItem>>,
    },
    /// Not token-gated: a confirmed clear always applies
    HistoryCleared { outcome: BestEffort<()> },
}

/// Outcome of a secondary operation whose failure is never shown
#[derive(Debug, Clone, PartialEq)]
pub enum BestEffort<T> {
    Succeeded(T),
    /// The failure was observed and deliberately dropped
    Discarded(TransportError),
}

impl<T> From<Result<T, TransportError>> for BestEffort<T> {
    fn from(result: Result<T, TransportError>) -> Self {
        match result {
            Ok(value) => BestEffort::Succeeded(value),
            Err(error) => BestEffort::Discarded(error),
        }
    }
}
