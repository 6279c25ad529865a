//! Durable outputs: identifier ledgers and per-query count maps
//!
//! Flat files under the configured data directory are the source of
//! truth; nothing here is merged with in-memory state at read time.

pub mod counts;
pub mod ledger;

pub use counts::CountStore;
pub use ledger::IdLedger;
