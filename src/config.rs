//! Client configuration from the environment

use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Where the client talks to and where it logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Answering service root, without a trailing `/`
    pub api_base: String,
    pub log_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup; unset or blank values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = var("KB_ASK_API_BASE")
            .map_or_else(|| DEFAULT_API_BASE.to_string(), |base| base.trim().to_string());
        let api_base = api_base.trim_end_matches('/').to_string();

        let log_file = var("KB_ASK_LOG_FILE").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(format!("{home}/.kb-ask/kb-ask.log"))
            },
            PathBuf::from,
        );

        Self { api_base, log_file }
    }
}
