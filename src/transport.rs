//! Transport to the answering service
//!
//! A minimal JSON request/response exchange. Nothing above this module
//! depends on how the exchange is carried out, only on the `Transport`
//! contract.

mod error;
mod http;

#[cfg(test)]
pub mod testing;

pub use error::TransportError;
pub use http::HttpTransport;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// HTTP method used by the answering service endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One JSON exchange with the answering service
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single attempt. No retries, no timeout beyond the
    /// platform default.
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        (**self).call(method, path, body).await
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport<T> {
    inner: T,
}

impl<T: Transport> LoggingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transport> Transport for LoggingTransport<T> {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.call(method, path, body).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    method = %method,
                    path = %path,
                    duration_ms = %duration.as_millis(),
                    "Request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind(),
                    error = %e,
                    "Request failed"
                );
            }
        }

        result
    }
}
