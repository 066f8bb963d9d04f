//! Terminal presentation of the session
//!
//! `view` derives display values from the session state, `render` draws
//! them with ratatui, and `tui` runs the crossterm event loop.

mod input;
mod render;
mod tui;
mod view;

pub use tui::run_ui;
