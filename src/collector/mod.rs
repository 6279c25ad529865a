//! Incremental collection engine
//!
//! Three layers, leaf-first: [`page`] runs the stability-detection loop
//! for one query value, [`orchestrator`] drives it across an ordered
//! value sequence and owns the durable outputs, [`coordinator`]
//! sequences the whole run across both query types and derives the
//! global uniqueness statistic.

pub mod coordinator;
pub mod orchestrator;
pub mod page;

pub use coordinator::{RunCoordinator, RunPhase, RunReport};
pub use orchestrator::{OrchestrationReport, QueryOrchestrator, SkippedQuery};
pub use page::{CollectOutcome, PageCollector};
