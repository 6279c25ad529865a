//! Browsing session contract and WebDriver implementation
//!
//! The collection engine only needs three things from a browser: go to a
//! URL, hand back the currently rendered document, and trigger the
//! listing to load more content. [`ListingSession`] is that contract;
//! [`WebdriverSession`] implements it against a W3C WebDriver server.

pub mod webdriver;

use async_trait::async_trait;

use crate::utils::error::SessionError;

pub use webdriver::WebdriverSession;

/// Contract the collection engine requires from a browsing surface
///
/// One navigation or read is in flight at a time; implementations are
/// shared across the whole multi-query run.
#[async_trait]
pub trait ListingSession: Send + Sync {
    /// Navigate the session to a URL
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Read the currently rendered document
    async fn page_source(&self) -> Result<String, SessionError>;

    /// Trigger the listing to reveal more content (scroll to bottom)
    async fn load_more(&self) -> Result<(), SessionError>;
}
