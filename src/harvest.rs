//! Person-name harvesting from the alphabet directory
//!
//! The directory page links to one listing per letter; each listing
//! carries the person names that become the `find`-type query values.
//! Names are kept in page order, verbatim.

use std::fs;
use std::io;
use std::path::Path;
use url::Url;

use crate::browser::ListingSession;
use crate::parser;
use crate::utils::error::HarvestError;

/// Harvests the name sequence the `find` orchestration queries with
pub struct NameHarvester {
    /// Directory page carrying the alphabet index
    directory_url: String,
}

impl NameHarvester {
    #[must_use]
    pub fn new(directory_url: impl Into<String>) -> Self {
        Self {
            directory_url: directory_url.into(),
        }
    }

    /// Collect every person name reachable from the alphabet index
    ///
    /// # Errors
    ///
    /// Returns `HarvestError::NoLetterIndex` if the directory page has
    /// no alphabet links, and session errors as they occur — harvesting
    /// has no per-letter degradation, a broken directory makes the
    /// whole `find` orchestration meaningless.
    pub async fn harvest<S>(&self, session: &S) -> Result<Vec<String>, HarvestError>
    where
        S: ListingSession + ?Sized,
    {
        tracing::info!(url = %self.directory_url, "Harvesting name directory");

        session.navigate(&self.directory_url).await?;
        let index = session.page_source().await?;

        let links = parser::letter_links(&index);
        if links.is_empty() {
            return Err(HarvestError::NoLetterIndex);
        }

        let base = Url::parse(&self.directory_url)?;
        let mut names = Vec::new();

        for link in &links {
            let letter_url = base.join(link)?;
            tracing::debug!(url = %letter_url, "Visiting letter page");

            session.navigate(letter_url.as_str()).await?;
            let page = session.page_source().await?;
            names.extend(parser::person_names(&page));
        }

        tracing::info!(
            letters = links.len(),
            names = names.len(),
            "Name harvest finished"
        );

        Ok(names)
    }
}

/// Persist harvested names, one per line
pub fn save_names(path: &Path, names: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut content = names.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)
}

/// Load a previously harvested name file
pub fn load_names(path: &Path) -> io::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
