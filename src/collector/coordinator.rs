//! Top-level run sequencing
//!
//! One browsing session is created for the whole run and closed on
//! every exit path. Session creation is the only fatal step; everything
//! after it degrades per query value inside the orchestrator.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::browser::WebdriverSession;
use crate::collector::orchestrator::{OrchestrationReport, QueryOrchestrator};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::harvest::{self, NameHarvester};
use crate::models::{QueryType, QueryValue};

/// Phases of a full run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    NamesCollected,
    YearIdsCollected,
    NameIdsCollected,
    Done,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::NamesCollected => write!(f, "names_collected"),
            Self::YearIdsCollected => write!(f, "year_ids_collected"),
            Self::NameIdsCollected => write!(f, "name_ids_collected"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Aggregates of a completed run
#[derive(Debug)]
pub struct RunReport {
    /// Last phase reached (always `Done` for a returned report)
    pub phase: RunPhase,

    /// Harvested name count
    pub names_collected: usize,

    /// Year-keyed orchestration aggregates
    pub year_report: OrchestrationReport,

    /// Name-keyed orchestration aggregates
    pub name_report: OrchestrationReport,

    /// Distinct identifiers across both query types
    pub total_unique: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Sequences name harvesting and both orchestrations over one session
pub struct RunCoordinator {
    config: Config,
}

impl RunCoordinator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute the full run
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the browsing
    /// session cannot be created, name harvesting fails, or durable
    /// storage fails. Per-query collection failures do not surface
    /// here; they are reported in the orchestration reports.
    pub async fn run(&self) -> Result<RunReport> {
        self.config
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;

        let session = WebdriverSession::connect_with_retry(&self.config.webdriver)
            .await
            .map_err(Error::from)?;

        let outcome = self.drive(&session).await;

        // Session release must not depend on the run outcome.
        if let Err(error) = session.close().await {
            tracing::warn!(error = %error, "Failed to close browsing session");
        }

        outcome
    }

    async fn drive(&self, session: &WebdriverSession) -> Result<RunReport> {
        let started_at = Utc::now();
        tracing::info!(phase = %RunPhase::Start, "Run starting");

        let harvester = NameHarvester::new(self.config.scrape.directory_url.clone());
        let names = harvester.harvest(session).await?;
        harvest::save_names(&self.config.storage.names_path(), &names)?;
        tracing::info!(
            phase = %RunPhase::NamesCollected,
            names = names.len(),
            "Names collected"
        );

        let orchestrator = QueryOrchestrator::new(&self.config);

        let years = QueryValue::years(self.config.scrape.year_start, self.config.scrape.year_end);
        let year_report = orchestrator.run(session, QueryType::Year, &years).await?;
        tracing::info!(
            phase = %RunPhase::YearIdsCollected,
            unique = year_report.unique_count,
            "Year ids collected"
        );

        let names_collected = names.len();
        let name_values = QueryValue::names(names);
        let name_report = orchestrator
            .run(session, QueryType::Find, &name_values)
            .await?;
        tracing::info!(
            phase = %RunPhase::NameIdsCollected,
            unique = name_report.unique_count,
            "Name ids collected"
        );

        let total_unique = unique_union([&year_report.ids, &name_report.ids]);
        tracing::info!(
            phase = %RunPhase::Done,
            total_unique,
            "Run complete"
        );

        Ok(RunReport {
            phase: RunPhase::Done,
            names_collected,
            year_report,
            name_report,
            total_unique,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Distinct identifier count across collections
///
/// The same physical record can be indexed by both a year and a name;
/// the union deduplicates across both corpora.
pub fn unique_union<'a, I>(collections: I) -> usize
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    for collection in collections {
        seen.extend(collection.iter().map(String::as_str));
    }
    seen.len()
}
