//! Error types shared across PageShot crates.

use std::path::PathBuf;

/// Top-level error type for PageShot operations.
///
/// Every message names the operation that failed and the root cause, so a
/// front end can report it verbatim.
#[derive(Debug, thiserror::Error)]
pub enum PageshotError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("No {extension} images found in {dir}")]
    NoImages { dir: PathBuf, extension: String },

    #[error("Invalid capture region: {message}")]
    InvalidRegion { message: String },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Input simulation error: {message}")]
    Input { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },
}

/// Result type alias using PageshotError.
pub type PageshotResult<T> = Result<T, PageshotError>;

impl PageshotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_region(msg: impl Into<String>) -> Self {
        Self::InvalidRegion {
            message: msg.into(),
        }
    }

    pub fn decode(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error belongs to the configuration class: the operation
    /// was rejected before any work started and nothing was created.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::DirectoryNotFound { .. }
                | Self::NoImages { .. }
                | Self::InvalidRegion { .. }
        )
    }
}
