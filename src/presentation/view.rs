//! Pure derivations from session state
//!
//! Nothing here mutates the session; the renderer only reads these.

use crate::api::HistoryItem;
use crate::state_machine::SessionState;
use chrono::{Local, TimeZone};

/// Shown when an answer carries no score
pub const SCORE_PLACEHOLDER: &str = "—";

/// Relevance score as a 4-decimal fixed string
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{score:.4}"),
        None => SCORE_PLACEHOLDER.to_string(),
    }
}

/// Score text memoized on the answer
///
/// Recomputed only when `SessionState::answer_revision` moves.
#[derive(Debug, Default)]
pub struct ScoreMemo {
    cached: Option<(u64, String)>,
    #[cfg(test)]
    computations: u64,
}

impl ScoreMemo {
    pub fn get(&mut self, state: &SessionState) -> &str {
        let revision = state.answer_revision();
        let fresh = matches!(&self.cached, Some((cached, _)) if *cached == revision);
        if !fresh {
            let text = format_score(state.answer().and_then(|a| a.score));
            #[cfg(test)]
            {
                self.computations += 1;
            }
            self.cached = Some((revision, text));
        }
        self.cached
            .as_ref()
            .map_or(SCORE_PLACEHOLDER, |(_, text)| text.as_str())
    }

    #[cfg(test)]
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

/// Everything the answer panel shows
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerView<'a> {
    pub source: &'static str,
    pub score: &'a str,
    pub body: &'a str,
    pub matched_question: Option<&'a str>,
    pub trace: &'a [String],
}

impl AnswerView<'_> {
    pub fn source_chip(&self) -> String {
        format!("Source: {}", self.source)
    }

    pub fn score_chip(&self) -> String {
        format!("Score: {}", self.score)
    }
}

/// `None` while there is no answer to show
pub fn answer_view<'a>(state: &'a SessionState, score: &'a str) -> Option<AnswerView<'a>> {
    state.answer().map(|answer| AnswerView {
        source: answer.source.as_str(),
        score,
        body: &answer.answer,
        matched_question: answer.matched_question.as_deref(),
        trace: answer.trace_lines(),
    })
}

/// Label of the submit control
pub fn ask_label(state: &SessionState) -> &'static str {
    if state.is_loading() {
        "Thinking..."
    } else {
        "Ask"
    }
}

/// Submit is enabled only when idle with a non-blank draft
pub fn can_submit(state: &SessionState) -> bool {
    !state.is_loading() && !state.draft().trim().is_empty()
}

/// `<local date-time>: <question>`
pub fn history_line(item: &HistoryItem) -> String {
    format!("{}: {}", format_timestamp(item.timestamp), item.question)
}

fn format_timestamp(ts: i64) -> String {
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map_or_else(|| ts.to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
