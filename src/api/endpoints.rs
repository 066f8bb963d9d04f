//! Typed calls to the answering service

use super::types::{AnswerResult, AskRequest, HistoryItem, HistoryResponse};
use crate::transport::{Method, Transport, TransportError};
use serde_json::json;

/// Number of history entries requested and kept
pub const HISTORY_LIMIT: usize = 10;

/// `POST /ask`
pub async fn ask<T: Transport + ?Sized>(
    transport: &T,
    question: &str,
) -> Result<AnswerResult, TransportError> {
    let body = serde_json::to_value(AskRequest { question })
        .map_err(|e| TransportError::malformed(format!("Unencodable question: {e}")))?;
    let value = transport.call(Method::Post, "/ask", Some(&body)).await?;

    serde_json::from_value(value)
        .map_err(|e| TransportError::malformed(format!("Unexpected answer shape: {e}")))
}

/// `GET /history?limit=N`, most recent first
pub async fn fetch_history<T: Transport + ?Sized>(
    transport: &T,
    limit: usize,
) -> Result<Vec<HistoryItem>, TransportError> {
    let path = format!("/history?limit={limit}");
    let value = transport.call(Method::Get, &path, None).await?;

    let response: HistoryResponse = serde_json::from_value(value)
        .map_err(|e| TransportError::malformed(format!("Unexpected history shape: {e}")))?;

    Ok(response.items.unwrap_or_default())
}

/// `POST /history/clear`
///
/// Any success status counts; the body is ignored even when it is not JSON.
pub async fn clear_history<T: Transport + ?Sized>(transport: &T) -> Result<(), TransportError> {
    match transport
        .call(Method::Post, "/history/clear", Some(&json!({})))
        .await
    {
        Ok(_) | Err(TransportError::MalformedResponse(_)) => Ok(()),
        Err(e) => Err(e),
    }
}
