//! Integration tests for the collection engine
//!
//! A scripted in-memory session stands in for the browser: each query
//! URL maps to a sequence of rendered snapshots, and every `load_more`
//! advances to the next one, simulating scroll-driven growth.

use async_trait::async_trait;
use std::sync::Mutex;
use tempfile::tempdir;

use pamyat::browser::ListingSession;
use pamyat::collector::{CollectOutcome, PageCollector, QueryOrchestrator};
use pamyat::config::{Config, StabilityConfig};
use pamyat::models::{QueryType, QueryValue, StabilityVerdict};
use pamyat::storage::{CountStore, IdLedger};
use pamyat::utils::error::SessionError;

/// Rendered-page script for one query URL
#[derive(Clone)]
enum Script {
    /// Fixed snapshots; the last one repeats once exhausted
    Pages(Vec<String>),
    /// One more identifier appears on every scroll, forever
    Growing,
    /// Navigation to this URL fails
    FailNavigation,
    /// Reading the rendered document fails
    FailRead,
}

struct ScriptedSession {
    scripts: Vec<(String, Script)>,
    state: Mutex<ActiveScript>,
}

struct ActiveScript {
    script: Option<Script>,
    step: usize,
}

impl ScriptedSession {
    fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(fragment, script)| (fragment.to_string(), script))
                .collect(),
            state: Mutex::new(ActiveScript {
                script: None,
                step: 0,
            }),
        }
    }
}

#[async_trait]
impl ListingSession for ScriptedSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let script = self
            .scripts
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, script)| script.clone())
            .unwrap_or(Script::Pages(vec![String::new()]));

        if matches!(script, Script::FailNavigation) {
            return Err(SessionError::Protocol {
                error: "unknown error".into(),
                message: "navigation failed".into(),
            });
        }

        let mut state = self.state.lock().unwrap();
        state.script = Some(script);
        state.step = 0;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        let state = self.state.lock().unwrap();
        match state.script.as_ref() {
            Some(Script::Pages(pages)) => {
                Ok(pages[state.step.min(pages.len() - 1)].clone())
            }
            Some(Script::Growing) => {
                let ids: Vec<String> = (0..=state.step).map(|i| format!("g{i}")).collect();
                Ok(grid(&ids.iter().map(String::as_str).map(Some).collect::<Vec<_>>()))
            }
            Some(Script::FailRead) => Err(SessionError::Protocol {
                error: "stale element reference".into(),
                message: "grid went away".into(),
            }),
            _ => Ok(String::new()),
        }
    }

    async fn load_more(&self) -> Result<(), SessionError> {
        self.state.lock().unwrap().step += 1;
        Ok(())
    }
}

/// Build a photo grid; `None` renders an item without the id attribute
fn grid(ids: &[Option<&str>]) -> String {
    let items: String = ids
        .iter()
        .map(|id| match id {
            Some(id) => format!(r#"<div class="main__photo-item" data-id="{id}"></div>"#),
            None => r#"<div class="main__photo-item"></div>"#.to_string(),
        })
        .collect();
    format!(r#"<html><body><div class="main__photo">{items}</div></body></html>"#)
}

fn fast_policy() -> StabilityConfig {
    StabilityConfig {
        poll_interval_ms: 1,
        max_iterations: 50,
        max_duration_secs: 60,
    }
}

fn test_config(data_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.scrape.listing_url = String::from("https://archive.test/");
    config.storage.data_dir = data_dir.to_path_buf();
    config.stability = fast_policy();
    config
}

/// A listing that settles at three real identifiers plus the sentinel
/// yields exactly those three, sentinel excluded.
#[tokio::test]
async fn test_stability_termination_excludes_sentinel() {
    let session = ScriptedSession::new(vec![(
        "year=1941",
        Script::Pages(vec![grid(&[Some("a"), Some("b"), Some("c"), None])]),
    )]);

    let dir = tempdir().unwrap();
    let mut ledger = IdLedger::open(dir.path().join("ids.txt")).unwrap();
    let collector = PageCollector::new("https://archive.test/", fast_policy());

    let outcome = collector
        .collect(&session, QueryType::Year, &QueryValue::Year(1941), &mut ledger)
        .await;

    match outcome {
        CollectOutcome::Collected(result) => {
            assert_eq!(result.count(), 3);
            assert_eq!(result.verdict, StabilityVerdict::Stable);
            let expected: Vec<&str> = vec!["a", "b", "c"];
            assert_eq!(result.ids.iter().map(String::as_str).collect::<Vec<_>>(), expected);
        }
        CollectOutcome::Skipped { reason } => panic!("unexpected skip: {reason}"),
    }

    let mut persisted = ledger.all().unwrap();
    persisted.sort();
    assert_eq!(persisted, vec!["a", "b", "c"]);
}

/// A listing that grows across scrolls settles only once growth stops.
#[tokio::test]
async fn test_growth_delays_stability() {
    let session = ScriptedSession::new(vec![(
        "year=1942",
        Script::Pages(vec![
            grid(&[Some("a")]),
            grid(&[Some("a"), Some("b")]),
            grid(&[Some("a"), Some("b"), Some("c")]),
        ]),
    )]);

    let dir = tempdir().unwrap();
    let mut ledger = IdLedger::open(dir.path().join("ids.txt")).unwrap();
    let collector = PageCollector::new("https://archive.test/", fast_policy());

    let outcome = collector
        .collect(&session, QueryType::Year, &QueryValue::Year(1942), &mut ledger)
        .await;

    match outcome {
        CollectOutcome::Collected(result) => {
            assert_eq!(result.count(), 3);
            assert_eq!(result.verdict, StabilityVerdict::Stable);
        }
        CollectOutcome::Skipped { reason } => panic!("unexpected skip: {reason}"),
    }
}

/// A listing that stabilizes at only the sentinel yields count 0 and
/// persists nothing.
#[tokio::test]
async fn test_sentinel_only_listing_counts_zero() {
    let session = ScriptedSession::new(vec![(
        "year=1874",
        Script::Pages(vec![grid(&[None])]),
    )]);

    let dir = tempdir().unwrap();
    let mut ledger = IdLedger::open(dir.path().join("ids.txt")).unwrap();
    let collector = PageCollector::new("https://archive.test/", fast_policy());

    let outcome = collector
        .collect(&session, QueryType::Year, &QueryValue::Year(1874), &mut ledger)
        .await;

    match outcome {
        CollectOutcome::Collected(result) => {
            assert_eq!(result.count(), 0);
            assert!(result.ids.is_empty());
        }
        CollectOutcome::Skipped { reason } => panic!("unexpected skip: {reason}"),
    }

    assert!(ledger.all().unwrap().is_empty());
}

/// A listing that never stops growing terminates with the timeout
/// verdict and keeps the partial set.
#[tokio::test]
async fn test_unstable_listing_times_out_with_partial_set() {
    let session = ScriptedSession::new(vec![("year=1950", Script::Growing)]);

    let dir = tempdir().unwrap();
    let mut ledger = IdLedger::open(dir.path().join("ids.txt")).unwrap();
    let policy = StabilityConfig {
        poll_interval_ms: 1,
        max_iterations: 5,
        max_duration_secs: 60,
    };
    let collector = PageCollector::new("https://archive.test/", policy);

    let outcome = collector
        .collect(&session, QueryType::Year, &QueryValue::Year(1950), &mut ledger)
        .await;

    match outcome {
        CollectOutcome::Collected(result) => {
            assert_eq!(result.verdict, StabilityVerdict::TimedOut);
            assert!(!result.ids.is_empty());
        }
        CollectOutcome::Skipped { reason } => panic!("unexpected skip: {reason}"),
    }

    assert!(!ledger.all().unwrap().is_empty());
}

/// A failure on value #3 of 5 leaves the other four in the count map
/// and the ledger; #3 appears only in the skipped list.
#[tokio::test]
async fn test_partial_failure_tolerance() {
    let session = ScriptedSession::new(vec![
        ("year=1941", Script::Pages(vec![grid(&[Some("a")])])),
        ("year=1942", Script::Pages(vec![grid(&[Some("b")])])),
        ("year=1943", Script::FailNavigation),
        ("year=1944", Script::Pages(vec![grid(&[Some("c")])])),
        ("year=1945", Script::Pages(vec![grid(&[Some("a"), Some("d")])])),
    ]);

    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let orchestrator = QueryOrchestrator::new(&config);

    let values = QueryValue::years(1941, 1946);
    let report = orchestrator
        .run(&session, QueryType::Year, &values)
        .await
        .unwrap();

    assert_eq!(report.counts.len(), 4);
    assert!(!report.counts.contains_key("1943"));
    assert_eq!(report.counts["1941"], 1);
    assert_eq!(report.counts["1945"], 2);

    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].value, QueryValue::Year(1943));

    // Ledger holds the duplicate-tolerant union of the successful values.
    let mut ids = report.ids.clone();
    ids.sort();
    assert_eq!(ids, vec!["a", "a", "b", "c", "d"]);
    assert_eq!(report.unique_count, 4);
}

/// The read-failure path is absorbed the same way as navigation failure.
#[tokio::test]
async fn test_read_failure_is_skipped() {
    let session = ScriptedSession::new(vec![("year=1941", Script::FailRead)]);

    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let orchestrator = QueryOrchestrator::new(&config);

    let report = orchestrator
        .run(&session, QueryType::Year, &[QueryValue::Year(1941)])
        .await
        .unwrap();

    assert!(report.counts.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.contains("stale element"));
}

/// The ledger only grows across consecutive orchestrations of the same
/// query type, and the count map is rebuilt each run.
#[tokio::test]
async fn test_append_only_growth_across_runs() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let orchestrator = QueryOrchestrator::new(&config);

    let session = ScriptedSession::new(vec![
        ("year=1941", Script::Pages(vec![grid(&[Some("a"), Some("b")])])),
        ("year=1942", Script::Pages(vec![grid(&[Some("b"), Some("c")])])),
    ]);

    let first = orchestrator
        .run(&session, QueryType::Year, &[QueryValue::Year(1941)])
        .await
        .unwrap();
    assert_eq!(first.ids.len(), 2);

    let second = orchestrator
        .run(&session, QueryType::Year, &[QueryValue::Year(1942)])
        .await
        .unwrap();

    // Re-read reflects both runs; nothing was lost or deduplicated.
    assert_eq!(second.ids.len(), 4);
    assert_eq!(second.unique_count, 3);

    // The count map only carries the latest run's values.
    let counts = CountStore::new(config.storage.counts_path(QueryType::Year))
        .load()
        .unwrap();
    assert_eq!(counts.len(), 1);
    assert!(counts.contains_key("1942"));
}

/// Name-keyed orchestration writes to its own ledger and count map.
#[tokio::test]
async fn test_find_orchestration_uses_name_outputs() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let orchestrator = QueryOrchestrator::new(&config);

    let session = ScriptedSession::new(vec![(
        "find=",
        Script::Pages(vec![grid(&[Some("x")])]),
    )]);

    let values = vec![QueryValue::Name("Иванов".into())];
    let report = orchestrator
        .run(&session, QueryType::Find, &values)
        .await
        .unwrap();

    assert_eq!(report.counts["Иванов"], 1);
    assert!(config.storage.ledger_path(QueryType::Find).exists());
    assert!(config.storage.counts_path(QueryType::Find).exists());
    assert!(!config.storage.ledger_path(QueryType::Year).exists());
}
