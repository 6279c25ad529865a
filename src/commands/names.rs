use anyhow::Result;
use std::path::PathBuf;

use pamyat::browser::WebdriverSession;
use pamyat::config::Config;
use pamyat::harvest::{self, NameHarvester};

pub async fn names(config: Config, output: Option<PathBuf>) -> Result<()> {
    println!("Harvesting names from {}", config.scrape.directory_url);

    let session = WebdriverSession::connect_with_retry(&config.webdriver).await?;

    let harvester = NameHarvester::new(config.scrape.directory_url.clone());
    let outcome = harvester.harvest(&session).await;

    if let Err(error) = session.close().await {
        tracing::warn!(error = %error, "Failed to close browsing session");
    }

    let names = outcome?;
    let path = output.unwrap_or_else(|| config.storage.names_path());
    harvest::save_names(&path, &names)?;

    println!("{} names saved to {}", names.len(), path.display());

    Ok(())
}
