//! Per-query stability-detection loop
//!
//! An infinite-scroll listing has no "last page" marker; the only
//! termination signal is that triggering further growth stops producing
//! new items. The loop reads the rendered identifier set, scrolls,
//! waits a fixed interval for asynchronous content, and terminates once
//! the observed cardinality stops growing (`Stable`) or a configured
//! cap is hit first (`TimedOut`).

use std::collections::BTreeSet;
use std::time::Instant;
use url::Url;

use crate::browser::ListingSession;
use crate::config::StabilityConfig;
use crate::models::{QueryResult, QueryType, QueryValue, StabilityVerdict};
use crate::parser;
use crate::storage::IdLedger;
use crate::utils::error::CollectError;

/// Outcome of collecting one query value
///
/// Errors never cross this boundary: a failed value is reported as
/// `Skipped` so the orchestration can continue with the next one.
#[derive(Debug)]
pub enum CollectOutcome {
    /// The listing settled; identifiers were appended to the ledger
    Collected(QueryResult),

    /// Collection was abandoned for this value
    Skipped { reason: String },
}

/// Runs the stability loop for single (query type, query value) pairs
pub struct PageCollector {
    /// Listing base URL; query parameters are appended per value
    listing_url: String,

    /// Loop pacing and caps
    policy: StabilityConfig,
}

impl PageCollector {
    /// Create a collector for the given listing URL and policy
    #[must_use]
    pub fn new(listing_url: impl Into<String>, policy: StabilityConfig) -> Self {
        Self {
            listing_url: listing_url.into(),
            policy,
        }
    }

    /// Build the query URL: `{base}?mode=main&{query_type}={value}`
    pub fn query_url(
        &self,
        query_type: QueryType,
        value: &QueryValue,
    ) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&self.listing_url)?;
        url.query_pairs_mut()
            .append_pair("mode", "main")
            .append_pair(query_type.param(), &value.to_string());
        Ok(url)
    }

    /// Collect the stable identifier set for one query value
    ///
    /// On success the non-null identifiers are appended to `ledger`
    /// before the outcome is returned, so partial progress survives a
    /// failure in a later value. Any session, parse or ledger error
    /// yields `Skipped` and a warning; nothing is propagated.
    pub async fn collect<S>(
        &self,
        session: &S,
        query_type: QueryType,
        value: &QueryValue,
        ledger: &mut IdLedger,
    ) -> CollectOutcome
    where
        S: ListingSession + ?Sized,
    {
        match self.try_collect(session, query_type, value, ledger).await {
            Ok(result) => CollectOutcome::Collected(result),
            Err(error) => {
                tracing::warn!(
                    query_type = %query_type,
                    value = %value,
                    error = %error,
                    "Collection abandoned for this value"
                );
                CollectOutcome::Skipped {
                    reason: error.to_string(),
                }
            }
        }
    }

    async fn try_collect<S>(
        &self,
        session: &S,
        query_type: QueryType,
        value: &QueryValue,
        ledger: &mut IdLedger,
    ) -> Result<QueryResult, CollectError>
    where
        S: ListingSession + ?Sized,
    {
        let url = self.query_url(query_type, value)?;
        session.navigate(url.as_str()).await?;

        let started = Instant::now();
        let mut prev_cardinality = 0usize;
        let mut iterations = 0u32;

        let (ids, verdict) = loop {
            iterations += 1;

            let rendered = parser::photo_ids(&session.page_source().await?);

            let mut ids = BTreeSet::new();
            let mut sentinel_seen = false;
            for id in rendered {
                match id {
                    Some(id) => {
                        ids.insert(id);
                    }
                    None => sentinel_seen = true,
                }
            }

            // The sentinel participates in growth detection but never in
            // the returned set.
            let cardinality = ids.len() + usize::from(sentinel_seen);

            session.load_more().await?;
            tokio::time::sleep(self.policy.poll_interval()).await;

            if cardinality <= prev_cardinality {
                break (ids, StabilityVerdict::Stable);
            }

            if iterations >= self.policy.max_iterations
                || started.elapsed() >= self.policy.max_duration()
            {
                tracing::warn!(
                    query_type = %query_type,
                    value = %value,
                    iterations,
                    rendered = cardinality,
                    "Stability not reached within caps; keeping partial set"
                );
                break (ids, StabilityVerdict::TimedOut);
            }

            tracing::debug!(
                query_type = %query_type,
                value = %value,
                iteration = iterations,
                rendered = cardinality,
                "Listing still growing"
            );

            prev_cardinality = cardinality;
        };

        ledger.append_all(ids.iter().map(String::as_str))?;

        tracing::info!(
            query_type = %query_type.noun(),
            value = %value,
            count = ids.len(),
            verdict = %verdict,
            "Listing settled"
        );

        Ok(QueryResult::new(ids, verdict))
    }
}
