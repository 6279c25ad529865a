use anyhow::{Context, Result};
use std::path::PathBuf;

use pamyat::browser::WebdriverSession;
use pamyat::collector::QueryOrchestrator;
use pamyat::config::Config;
use pamyat::harvest;
use pamyat::models::{QueryType, QueryValue};

pub async fn ids(
    config: Config,
    query_type: QueryType,
    names_file: Option<PathBuf>,
) -> Result<()> {
    let values = match query_type {
        QueryType::Year => {
            QueryValue::years(config.scrape.year_start, config.scrape.year_end)
        }
        QueryType::Find => {
            let path = names_file.unwrap_or_else(|| config.storage.names_path());
            let names = harvest::load_names(&path).with_context(|| {
                format!(
                    "Failed to load names from {} (run `pamyat names` first?)",
                    path.display()
                )
            })?;
            QueryValue::names(names)
        }
    };

    println!(
        "Collecting ids by {} ({} query values)",
        query_type.noun(),
        values.len()
    );

    let session = WebdriverSession::connect_with_retry(&config.webdriver).await?;

    let orchestrator = QueryOrchestrator::new(&config);
    let outcome = orchestrator.run(&session, query_type, &values).await;

    if let Err(error) = session.close().await {
        tracing::warn!(error = %error, "Failed to close browsing session");
    }

    let report = outcome?;

    println!();
    println!("Collected: {} values", report.counts.len());
    println!("Skipped:   {} values", report.skipped.len());
    println!(
        "Unique ids by {}: {}",
        query_type.noun(),
        report.unique_count
    );

    for skip in &report.skipped {
        println!("  skipped {}: {}", skip.value, skip.reason);
    }

    Ok(())
}
