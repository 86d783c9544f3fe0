//! Domain error types

use thiserror::Error;

use super::platform::Platform;

/// Errors raised by notification managers and their native ports
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("Not connected. Call initialize() first.")]
    NotConnected,

    #[error("Notification manager has been disposed")]
    Disposed,

    #[error("Desktop notifications are not supported on {0}")]
    PlatformNotSupported(Platform),

    #[error("Failed to connect to notification service: {0}")]
    ConnectionFailed(String),

    #[error("Notification service call failed: {0}")]
    ServiceFailed(String),

    #[error("Unable to determine application name: {0}")]
    ProcessName(String),
}

impl NotificationError {
    /// Shorthand for an invalid argument error
    pub fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>h, <number>m, <number>s or a combination (e.g., 30s, 1m, 2m30s, 1h)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
