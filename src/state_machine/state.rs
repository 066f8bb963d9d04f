//! Session state types

use crate::api::{AnswerResult, HistoryItem};

/// Where the current ask cycle stands
///
/// Loading, an error and an answer are mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AskStatus {
    /// Nothing asked yet
    #[default]
    Idle,

    /// Ask request in flight
    Loading { seq: u64 },

    /// Last ask succeeded
    Answered(AnswerResult),

    /// Last ask failed - UI displays the message directly
    Errored { message: String },
}

/// Single source of truth for rendering
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub(super) draft: String,
    pub(super) status: AskStatus,
    /// Most recent first, never longer than `HISTORY_LIMIT`
    pub(super) history: Vec<HistoryItem>,
    /// Token of the latest issued ask
    pub(super) ask_seq: u64,
    /// Token of the latest issued history request (refresh or clear)
    pub(super) history_seq: u64,
    /// Bumped whenever the displayed answer is replaced or discarded
    pub(super) answer_revision: u64,
}

impl SessionState {
    pub fn draft(&self) -> &str {
        &self.draft
    }

    #[cfg(test)]
    pub fn status(&self) -> &AskStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, AskStatus::Loading { .. })
    }

    pub fn answer(&self) -> Option<&AnswerResult> {
        match &self.status {
            AskStatus::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            AskStatus::Errored { message } => Some(message),
            _ => None,
        }
    }

    pub fn history(&self) -> &[HistoryItem] {
        &self.history
    }

    #[cfg(test)]
    pub fn ask_seq(&self) -> u64 {
        self.ask_seq
    }

    #[cfg(test)]
    pub fn history_seq(&self) -> u64 {
        self.history_seq
    }

    /// Changes exactly when `answer()` may have changed
    pub fn answer_revision(&self) -> u64 {
        self.answer_revision
    }
}
