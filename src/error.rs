//! Error types for capture and preview operations.

use thiserror::Error;

/// Primary error type for snapcam operations.
#[derive(Error, Debug)]
pub enum SnapError {
    // Storage errors
    #[error("Failed to create photo file in {dir}: {reason}")]
    FileCreation { dir: String, reason: String },

    // Decode errors
    #[error("Failed to decode image '{path}': {reason}")]
    Decode { path: String, reason: String },

    #[error("Invalid dimensions '{input}': expected WIDTHxHEIGHT (e.g. 1080x1920)")]
    InvalidDimensions { input: String },

    // Display errors
    #[error("Display area is not laid out yet ({width}x{height})")]
    DisplayNotReady { width: u32, height: u32 },

    #[error("Failed to write preview to {path}: {reason}")]
    PreviewWrite { path: String, reason: String },

    // Capture errors
    #[error("Capture was cancelled before a photo was produced")]
    CaptureCancelled,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("No capture source available: {0}")]
    NoCaptureSource(String),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SnapError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::InvalidDimensions { .. }
                | Self::DisplayNotReady { .. }
                | Self::CaptureCancelled
                | Self::NoCaptureSource(_)
                | Self::ConfigNotFound { .. }
                | Self::ConfigInvalid(_)
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::FileCreation { .. } => Some("Check that the photo directory is writable"),
            Self::Decode { .. } => Some("Make sure the file exists and is a valid JPEG or PNG"),
            Self::InvalidDimensions { .. } => Some("Use WIDTHxHEIGHT, for example 1080x1920"),
            Self::DisplayNotReady { .. } => Some("Pass a non-zero --size"),
            Self::CaptureCancelled => Some("Run: snap capture"),
            Self::NoCaptureSource(_) => {
                Some("Set capture.command in the config file or use --import <FILE>")
            }
            Self::ConfigNotFound { .. } => Some("Run: snap init"),
            _ => None,
        }
    }

    /// Shorthand for a decode failure on `path`.
    pub fn decode(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience type alias for Results using SnapError.
pub type Result<T> = std::result::Result<T, SnapError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| SnapError::Other(format!("{}: {e}", f().into())))
    }
}
