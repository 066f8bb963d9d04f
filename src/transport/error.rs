//! Transport error types

use thiserror::Error;

/// Failure of a single exchange with the answering service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The exchange could not complete (DNS, connection, body read)
    #[error("Network error: {0}")]
    Network(String),
    /// The service answered with a status outside the success range
    #[error("HTTP {status}")]
    Http { status: u16 },
    /// Success status, but the body is not the expected JSON shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn http(status: u16) -> Self {
        Self::Http { status }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Short classification for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Http { .. } => "http",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}
