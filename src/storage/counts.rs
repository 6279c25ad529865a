//! Per-query count map persistence
//!
//! The count map is rebuilt fully on each run and written as a JSON
//! object keyed by the query value's display form. Values skipped
//! during orchestration are absent, not zero.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// JSON-backed store for one query type's count map
pub struct CountStore {
    path: PathBuf,
}

impl CountStore {
    /// Create a store for the given file location
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist the count map, replacing any previous contents
    pub fn save(&self, counts: &BTreeMap<String, usize>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create count map directory")?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create count map: {}", self.path.display()))?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, counts).context("Failed to serialize count map")?;

        Ok(())
    }

    /// Load a previously persisted count map
    pub fn load(&self) -> Result<BTreeMap<String, usize>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open count map: {}", self.path.display()))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader).context("Failed to parse count map")
    }

    /// Count map file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = CountStore::new(dir.path().join("other").join("count_ids_by_year.json"));

        let mut counts = BTreeMap::new();
        counts.insert("1941".to_string(), 17);
        counts.insert("1942".to_string(), 0);

        store.save(&counts).unwrap();
        assert_eq!(store.load().unwrap(), counts);
    }

    #[test]
    fn test_save_replaces_previous_contents() {
        let dir = tempdir().unwrap();
        let store = CountStore::new(dir.path().join("counts.json"));

        let mut first = BTreeMap::new();
        first.insert("1941".to_string(), 5);
        store.save(&first).unwrap();

        let second = BTreeMap::new();
        store.save(&second).unwrap();

        assert!(store.load().unwrap().is_empty());
    }
}
