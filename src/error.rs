//! Error types for preset loading and key-image rendering.

use thiserror::Error;

/// Primary error type for xpdeck operations.
#[derive(Error, Debug)]
pub enum DeckError {
    // Keyset errors
    #[error("Keyset file not found: {path}")]
    KeysetNotFound { path: String },

    #[error("Failed to parse keyset '{file}': {message}")]
    KeysetParse { file: String, message: String },

    #[error("Key index {index} out of range in '{file}': deck has {key_count} keys (0-{max_idx})")]
    KeyIndexOutOfRange {
        file: String,
        index: usize,
        key_count: usize,
        max_idx: usize,
    },

    // Image errors
    #[error("Icon file not found: {path}")]
    IconNotFound { path: String },

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    // Font errors
    #[error("Failed to load font '{path}': {reason}")]
    FontLoad { path: String, reason: String },

    #[error("Cannot render label '{label}': no font configured")]
    FontMissing { label: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl DeckError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::KeysetNotFound { .. }
                | Self::KeysetParse { .. }
                | Self::KeyIndexOutOfRange { .. }
                | Self::IconNotFound { .. }
                | Self::FontLoad { .. }
                | Self::FontMissing { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::KeysetNotFound { .. } => {
                Some("Every button with 'type: dir' needs a matching <name>.yaml keyset file")
            }
            Self::KeysetParse { .. } => Some("Check the YAML syntax of the keyset file"),
            Self::KeyIndexOutOfRange { .. } => {
                Some("Use --key-count or --model to match the target deck layout")
            }
            Self::IconNotFound { .. } => {
                Some("Icon files live under icons/ next to the keyset files")
            }
            Self::FontMissing { .. } => Some("Pass --font with a TrueType font file"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using DeckError.
pub type Result<T> = std::result::Result<T, DeckError>;

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
        self.map_err(|e| DeckError::Other(format!("{}: {e}", f().into())))
    }
}
