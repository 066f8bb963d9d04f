//! Interaction controller
//!
//! Owns the session state. User events and request completions both go
//! through the pure `transition`; the resulting effects are executed here.
//! Requests run as background tasks and each reports exactly one completion
//! event back over a channel, so the state is only ever mutated by the owner.

use crate::api;
use crate::state_machine::{transition, BestEffort, Effect, Event, SessionState, TransitionError};
use crate::transport::Transport;
#[cfg(test)]
use crate::{state_machine::Operation, transport::TransportError};
use std::sync::Arc;
use tokio::sync::mpsc;

const COMPLETION_BUFFER: usize = 32;

/// Drives the session against a transport
pub struct InteractionController<T: Transport + 'static> {
    state: SessionState,
    transport: Arc<T>,
    completion_tx: mpsc::Sender<Event>,
    completion_rx: mpsc::Receiver<Event>,
    /// Requests issued whose completion has not been applied yet
    in_flight: usize,
    /// Most recent best-effort failure that was observed and dropped
    #[cfg(test)]
    last_discarded: Option<(Operation, TransportError)>,
}

impl<T: Transport + 'static> InteractionController<T> {
    pub fn new(transport: T) -> Self {
        let (completion_tx, completion_rx) = mpsc::channel(COMPLETION_BUFFER);
        Self {
            state: SessionState::default(),
            transport: Arc::new(transport),
            completion_tx,
            completion_rx,
            in_flight: 0,
            #[cfg(test)]
            last_discarded: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[cfg(test)]
    pub fn last_discarded(&self) -> Option<&(Operation, TransportError)> {
        self.last_discarded.as_ref()
    }

    /// Initial mount: load the history once
    pub fn start(&mut self) {
        tracing::info!("Starting session");
        if let Err(e) = self.dispatch(Event::RefreshHistory) {
            tracing::error!(error = %e, "Initial history refresh rejected");
        }
    }

    /// Apply one event and launch whatever requests it produces
    pub fn dispatch(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(error = %e, "Event rejected");
                return Err(e);
            }
        };

        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(())
    }

    /// Wait for the next request to finish. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Event> {
        if self.in_flight == 0 {
            return None;
        }
        self.completion_rx.recv().await
    }

    /// Commit a completion produced by `next_completion`
    pub fn apply_completion(&mut self, event: Event) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Err(e) = self.dispatch(event) {
            // Completions are never rejected; this would be a logic error
            tracing::error!(error = %e, "Completion rejected");
        }
    }

    /// Apply completions until no request is in flight, including
    /// follow-up requests issued along the way
    pub async fn settle(&mut self) {
        while let Some(event) = self.next_completion().await {
            self.apply_completion(event);
        }
    }

    /// Ask and wait for the whole cycle, history refresh included
    #[cfg(test)]
    pub async fn ask(&mut self, question: impl Into<String>) -> Result<(), TransitionError> {
        self.dispatch(Event::Ask {
            question: question.into(),
        })?;
        self.settle().await;
        Ok(())
    }

    #[cfg(test)]
    pub async fn refresh_history(&mut self) {
        if self.dispatch(Event::RefreshHistory).is_ok() {
            self.settle().await;
        }
    }

    #[cfg(test)]
    pub async fn clear_history(&mut self) {
        if self.dispatch(Event::ClearHistory).is_ok() {
            self.settle().await;
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::SubmitAsk { seq, question } => {
                tracing::info!(seq, "Submitting question");
                let transport = self.transport.clone();
                self.spawn_request(async move {
                    let result = api::ask(&*transport, &question).await;
                    Event::AskCompleted { seq, result }
                });
            }

            Effect::FetchHistory { seq, limit } => {
                tracing::debug!(seq, limit, "Refreshing history");
                let transport = self.transport.clone();
                self.spawn_request(async move {
                    let outcome = BestEffort::from(api::fetch_history(&*transport, limit).await);
                    Event::HistoryFetched { seq, outcome }
                });
            }

            Effect::ClearHistory { seq } => {
                tracing::info!(seq, "Clearing history");
                let transport = self.transport.clone();
                self.spawn_request(async move {
                    let outcome = BestEffort::from(api::clear_history(&*transport).await);
                    Event::HistoryCleared { outcome }
                });
            }

            Effect::DiscardFailure { operation, error } => {
                tracing::warn!(
                    operation = operation.as_str(),
                    kind = error.kind(),
                    error = %error,
                    "Best-effort operation failed, ignoring"
                );
                #[cfg(test)]
                {
                    self.last_discarded = Some((operation, error));
                }
            }

            Effect::DropStale { operation, seq } => {
                tracing::debug!(operation = operation.as_str(), seq, "Dropping stale completion");
            }
        }
    }

    /// Run one request in the background; its event comes back through
    /// `next_completion`
    fn spawn_request<F>(&mut self, request: F)
    where
        F: std::future::Future<Output = Event> + Send + 'static,
    {
        self.in_flight += 1;
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let event = request.await;
            if completion_tx.send(event).await.is_err() {
                tracing::debug!("Controller gone, dropping completion");
            }
        });
    }
}
