//! Unified error handling for the pamyat crate
//!
//! Domain-specific errors live next to the code that raises them; this
//! module consolidates them into a single [`Error`] enum so callers can
//! match across module boundaries. Per-query recoverable errors are
//! absorbed at the collector boundary before they ever reach this type;
//! anything surfacing as [`Error`] aborts the run.

use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{CollectError, HarvestError, SessionError};

/// Unified error type for the pamyat crate
#[derive(Error, Debug)]
pub enum Error {
    /// Browsing session errors (WebDriver transport and protocol)
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Per-query collection errors
    #[error("Collect error: {0}")]
    Collect(#[from] CollectError),

    /// Name harvesting errors
    #[error("Harvest error: {0}")]
    Harvest(#[from] HarvestError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// Conversion from anyhow::Error at the binary boundary
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other {
            context: err.to_string(),
            source: None,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let session_err = SessionError::Protocol {
            error: "no such window".into(),
            message: "window was closed".into(),
        };
        let unified: Error = session_err.into();
        assert!(matches!(unified, Error::Session(_)));
    }

    #[test]
    fn test_ledger_error_wraps_io() {
        let err = Error::Collect(CollectError::Ledger(io::Error::other("disk full")));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::config("year_start must be before year_end");
        assert!(err.to_string().contains("year_start"));
    }

    #[test]
    fn test_harvest_error_display() {
        let err = Error::Harvest(HarvestError::NoLetterIndex);
        assert!(err.to_string().contains("alphabet index"));
    }
}
