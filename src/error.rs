//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level error enum
//! - Module-specific errors (e.g. [`CatalogError`], [`MetadataError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! Scoring has no error type: malformed attributes degrade to neutral scores.

use crate::archive::MetadataError;
use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::player::PlaybackError;
use crate::quality::WeightsError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Show catalog error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Remote metadata error
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Audio playback error
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected weight vector
    #[error("Invalid weights: {0}")]
    Weights(#[from] WeightsError),

    /// Input that could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(ctx))
    }
}
