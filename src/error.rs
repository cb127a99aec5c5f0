//! Error types for the player

use thiserror::Error;

/// Failures reported by the rendering engine through its error callback.
///
/// These are shown to the user as a notice. They never change playback
/// intent, and the user can retry by loading again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The resource could not be fetched or opened
    #[error("Network error: {0}")]
    Network(String),

    /// No decoder or demuxer handles the resource
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The stream was recognised but failed to decode
    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

/// Rejected user input. Callers drop it silently; the text field only flags it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("No URL entered")]
    Empty,

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Unsupported scheme '{0}'")]
    UnsupportedScheme(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
