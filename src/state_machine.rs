//! Core interaction state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, Operation};
pub use event::{BestEffort, Event};
pub use state::SessionState;
pub use transition::{transition, TransitionError};
