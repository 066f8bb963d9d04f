//! kb-ask - terminal client for a knowledge-base answering service
//!
//! Asks questions, shows where each answer came from and how it was
//! reached, and keeps the recent interaction history in view.

mod api;
mod config;
mod controller;
mod presentation;
mod state_machine;
mod transport;

use config::ClientConfig;
use controller::InteractionController;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::{HttpTransport, LoggingTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env();

    // The terminal belongs to the UI, so logs go to a file
    if let Some(parent) = config.log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kb_ask=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    tracing::info!(api_base = %config.api_base, "Starting kb-ask");

    let transport = LoggingTransport::new(HttpTransport::new(&config.api_base)?);
    let controller = InteractionController::new(transport);

    presentation::run_ui(controller).await?;

    tracing::info!("Shutting down");
    Ok(())
}
