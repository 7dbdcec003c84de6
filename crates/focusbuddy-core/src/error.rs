//! Core error types for focusbuddy-core.
//!
//! Every failure surfaces as one of these values. None of them is fatal to
//! a running session: the engines keep their last valid state and the
//! caller shows the message inline.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::TaskId;

/// Core error type for focusbuddy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad user input for a task
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A collaborator call failed or was rejected before it was made
    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The session runtime has shut down
    #[error("Session runtime is no longer running")]
    RuntimeClosed,
}

/// Task input errors. Recovered locally; no state changes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Give the task a name before adding it.")]
    EmptyTitle,

    #[error("Duration must be a number greater than 0 (got {value}).")]
    InvalidDuration { value: f64 },

    #[error("No task with id {0}")]
    UnknownTask(TaskId),
}

/// Errors at the collaborator boundary.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// No task could be derived from the prompt
    #[error("{0}")]
    Interpretation(String),

    /// The image service returned no image
    #[error("Image generation failed: {0}")]
    Generation(String),

    /// No photo bytes were supplied
    #[error("Please upload an image file.")]
    EmptyPhoto,

    /// Photo is not an image media type
    #[error("Unsupported file type '{mime_type}'. Upload a PNG or JPEG.")]
    UnsupportedMedia { mime_type: String },

    /// Photo exceeds the upload limit
    #[error("Image is too large ({size} bytes). Pick something under {limit} bytes.")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Request never produced a usable response
    #[error("Assistant request failed: {0}")]
    Transport(String),

    /// No endpoint configured
    #[error("Assistant endpoint is not configured (set assistant.base_url)")]
    NotConfigured,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Transport(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
