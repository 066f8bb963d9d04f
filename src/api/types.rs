//! API request and response types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which subsystem produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Knowledge-base match
    Kb,
    /// Generative fallback
    Llm,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Kb => "kb",
            Source::Llm => "llm",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /ask`
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// Response to `POST /ask`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub answer: String,
    pub source: Source,
    /// Nearest knowledge-base question, when a match informed the answer
    #[serde(default)]
    pub matched_question: Option<String>,
    /// Similarity of the knowledge-base match, in [0, 1]
    #[serde(default)]
    pub score: Option<f64>,
    /// Reasoning steps, in order
    #[serde(default)]
    pub trace: Option<Vec<String>>,
}

impl AnswerResult {
    /// Trace lines, empty when the service sent none
    pub fn trace_lines(&self) -> &[String] {
        self.trace.as_deref().unwrap_or_default()
    }
}

/// One entry of the server-side interaction log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Seconds since the epoch
    #[serde(rename = "ts")]
    pub timestamp: i64,
    pub question: String,
    pub answer: String,
    pub source: String,
}

/// Response to `GET /history`
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub items: Option<Vec<HistoryItem>>,
}
