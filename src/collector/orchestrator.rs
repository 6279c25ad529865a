//! Query orchestration for one query type
//!
//! Drives the page collector across an ordered value sequence,
//! accumulates counts, persists the count map, and derives the
//! type-level uniqueness statistic by re-reading the ledger from disk.

use std::collections::BTreeMap;

use crate::browser::ListingSession;
use crate::collector::page::{CollectOutcome, PageCollector};
use crate::config::{Config, StorageConfig};
use crate::error::Result;
use crate::models::{QueryType, QueryValue};
use crate::storage::{CountStore, IdLedger};

/// A query value whose collection was abandoned
#[derive(Debug, Clone)]
pub struct SkippedQuery {
    pub value: QueryValue,
    pub reason: String,
}

/// Everything one query type's orchestration produced
#[derive(Debug)]
pub struct OrchestrationReport {
    pub query_type: QueryType,

    /// Stabilized count per successfully collected value; skipped
    /// values have no entry
    pub counts: BTreeMap<String, usize>,

    /// Values abandoned because of a per-query failure
    pub skipped: Vec<SkippedQuery>,

    /// Full ledger contents as re-read from disk, duplicates included
    pub ids: Vec<String>,

    /// Distinct identifiers in `ids`
    pub unique_count: usize,
}

/// Drives the page collector across a value sequence
pub struct QueryOrchestrator {
    collector: PageCollector,
    storage: StorageConfig,
}

impl QueryOrchestrator {
    /// Create an orchestrator from the run configuration
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            collector: PageCollector::new(
                config.scrape.listing_url.clone(),
                config.stability.clone(),
            ),
            storage: config.storage.clone(),
        }
    }

    /// Collect every value sequentially and report the aggregates
    ///
    /// Per-value failures are absorbed into the skipped list; the only
    /// errors surfacing here are storage failures around the ledger and
    /// count map.
    pub async fn run<S>(
        &self,
        session: &S,
        query_type: QueryType,
        values: &[QueryValue],
    ) -> Result<OrchestrationReport>
    where
        S: ListingSession + ?Sized,
    {
        let mut ledger = IdLedger::open(self.storage.ledger_path(query_type))?;
        let mut counts = BTreeMap::new();
        let mut skipped = Vec::new();

        tracing::info!(
            query_type = %query_type.noun(),
            values = values.len(),
            ledger = %ledger.path().display(),
            "Starting id collection"
        );

        for value in values {
            match self
                .collector
                .collect(session, query_type, value, &mut ledger)
                .await
            {
                CollectOutcome::Collected(result) => {
                    counts.insert(value.to_string(), result.count());
                }
                CollectOutcome::Skipped { reason } => {
                    skipped.push(SkippedQuery {
                        value: value.clone(),
                        reason,
                    });
                }
            }
        }

        CountStore::new(self.storage.counts_path(query_type)).save(&counts)?;

        // The durable file, not the in-memory run, is the source of
        // truth: it may carry appends from a prior interrupted run.
        let ids = ledger.all()?;
        let unique_count = ledger.unique_count()?;

        tracing::info!(
            query_type = %query_type.noun(),
            unique = unique_count,
            collected = counts.len(),
            skipped = skipped.len(),
            "Finished id collection"
        );

        for skip in &skipped {
            tracing::warn!(
                query_type = %query_type,
                value = %skip.value,
                reason = %skip.reason,
                "Value skipped"
            );
        }

        Ok(OrchestrationReport {
            query_type,
            counts,
            skipped,
            ids,
            unique_count,
        })
    }
}
