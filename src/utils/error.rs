//! Error types for the pamyat collector
//!
//! This module defines custom error types used throughout the application.

use thiserror::Error;

/// Errors that can occur while driving the browsing session
#[derive(Error, Debug)]
pub enum SessionError {
    /// HTTP transport error talking to the WebDriver server
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// WebDriver protocol error payload
    #[error("WebDriver error: {error}: {message}")]
    Protocol { error: String, message: String },

    /// Response did not carry the expected `value` shape
    #[error("Malformed WebDriver response: {0}")]
    MalformedResponse(String),

    /// Endpoint URL could not be parsed
    #[error("Invalid WebDriver endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Errors that can abort collection for a single query value
#[derive(Error, Debug)]
pub enum CollectError {
    /// Session error while navigating, reading or scrolling
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Ledger append failed
    #[error("Ledger write failed: {0}")]
    Ledger(#[from] std::io::Error),

    /// Query URL could not be built
    #[error("Invalid listing URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur while harvesting the name directory
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Session error while navigating or reading
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The directory page exposed no alphabet links
    #[error("No alphabet index found on directory page")]
    NoLetterIndex,

    /// A letter link could not be resolved against the directory URL
    #[error("Invalid letter link: {0}")]
    InvalidLink(#[from] url::ParseError),

    /// Name file could not be written or read
    #[error("Name file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
