//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>h, <number>m, <number>s or a combination (e.g., 30s, 20m, 1h30m)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a recorder or application configuration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid channel count {0}: at least one channel is required")]
    InvalidChannelCount(u16),

    #[error("Unknown encoding: \"{0}\". Valid encodings are: wav, flac")]
    UnknownEncoding(String),

    #[error("Invalid option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

impl ConfigError {
    pub(crate) fn invalid_option(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
