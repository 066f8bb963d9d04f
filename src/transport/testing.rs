//! Mock transport for testing
//!
//! Lets the controller run end to end without a real answering service.

use super::{Method, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// A call observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Mock transport that returns queued responses per route
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, TransportError>>>>,
    delays: HashMap<String, Duration>,
    /// Record of all calls made
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hold every response on this route for `delay`
    pub fn with_delay(mut self, method: Method, path: &str, delay: Duration) -> Self {
        self.delays.insert(route_key(method, path), delay);
        self
    }

    /// Queue a successful response
    pub fn queue_ok(&self, method: Method, path: &str, value: Value) {
        self.queue(method, path, Ok(value));
    }

    /// Queue an error response
    pub fn queue_err(&self, method: Method, path: &str, error: TransportError) {
        self.queue(method, path, Err(error));
    }

    fn queue(&self, method: Method, path: &str, response: Result<Value, TransportError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(route_key(method, path))
            .or_default()
            .push_back(response);
    }

    /// Get recorded calls
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls made to one route
    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn route_key(method: Method, path: &str) -> String {
    format!("{method} {path}")
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let key = route_key(method, path);
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        self.responses
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::network("No mock response queued")))
    }
}
