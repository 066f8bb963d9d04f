//! Effects produced by state transitions

use crate::transport::TransportError;

/// The three user-triggered operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Ask,
    RefreshHistory,
    ClearHistory,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Ask => "ask",
            Operation::RefreshHistory => "refresh_history",
            Operation::ClearHistory => "clear_history",
        }
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// `POST /ask`
    SubmitAsk { seq: u64, question: String },

    /// `GET /history`
    FetchHistory { seq: u64, limit: usize },

    /// `POST /history/clear`
    ClearHistory { seq: u64 },

    /// A best-effort operation failed; record it, change nothing
    DiscardFailure {
        operation: Operation,
        error: TransportError,
    },

    /// A completion arrived for a request that is no longer the latest
    DropStale { operation: Operation, seq: u64 },
}

impl Effect {
    /// Whether executing this effect issues a network request
    #[cfg(test)]
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Effect::SubmitAsk { .. } | Effect::FetchHistory { .. } | Effect::ClearHistory { .. }
        )
    }
}
