//! pamyat - Pamyat Naroda photo archive ID harvester
//!
//! Collects unique photo-record identifiers from the archive's
//! infinite-scroll listing, keyed by calendar year and by person name,
//! and reports per-query counts plus the global unique total.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`browser`] - Browsing session contract and WebDriver implementation
//! - [`parser`] - HTML parsing for the photo grid and name directory
//! - [`collector`] - Stability-detection loop and query orchestration
//! - [`harvest`] - Person-name harvesting from the alphabet directory
//! - [`storage`] - Identifier ledgers and count maps
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use pamyat::collector::RunCoordinator;
//! use pamyat::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let coordinator = RunCoordinator::new(config);
//!     let report = coordinator.run().await?;
//!     println!("{} unique ids collected", report.total_unique);
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod collector;
pub mod config;
pub mod error;
pub mod harvest;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::browser::{ListingSession, WebdriverSession};
    pub use crate::collector::{CollectOutcome, PageCollector, QueryOrchestrator, RunCoordinator};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::{QueryResult, QueryType, QueryValue, StabilityVerdict};
    pub use crate::storage::{CountStore, IdLedger};
}

// Direct re-exports for convenience
pub use models::{QueryResult, QueryType, QueryValue, StabilityVerdict};
