mod config;

pub use config::{
    AssistantConfig, Config, NotificationsConfig, PetConfig, ScoringConfig, SpeechConfig,
    TimerConfig,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/focusbuddy[-dev]/` based on FOCUSBUDDY_ENV.
///
/// Set FOCUSBUDDY_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSBUDDY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusbuddy-dev")
    } else {
        base_dir.join("focusbuddy")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}
