//! Answering service API
//!
//! Wire types for `/ask` and `/history`, and typed calls over any
//! `Transport`.

mod endpoints;
mod types;

pub use endpoints::{ask, clear_history, fetch_history, HISTORY_LIMIT};
pub use types::*;
