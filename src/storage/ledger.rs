//! Append-only identifier ledger
//!
//! One newline-delimited file per query type, tolerant of duplicates:
//! the same identifier may be appended by many query values. The file
//! is the source of truth — [`IdLedger::all`] and
//! [`IdLedger::unique_count`] re-read it from disk rather than serving
//! an in-memory accumulation, so the reported numbers reflect exactly
//! what was persisted, including appends from a prior interrupted run
//! sharing the same file.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Durable, duplicate-tolerant identifier log for one query type
pub struct IdLedger {
    /// Ledger file location
    path: PathBuf,

    /// Open append handle, shared across the orchestration
    file: File,
}

impl IdLedger {
    /// Open a ledger, creating the file and its parent directories
    ///
    /// An existing file is kept and extended; the ledger only ever
    /// grows within a run.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self { path, file })
    }

    /// Append a single identifier
    pub fn append(&mut self, id: &str) -> io::Result<()> {
        writeln!(self.file, "{id}")
    }

    /// Append a batch of identifiers, then sync to disk
    pub fn append_all<'a, I>(&mut self, ids: I) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            self.append(id)?;
        }
        self.file.sync_data()
    }

    /// Re-read every persisted identifier, duplicates included, in file order
    pub fn all(&self) -> io::Result<Vec<String>> {
        let content = fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Number of distinct identifiers currently persisted
    pub fn unique_count(&self) -> io::Result<usize> {
        let ids = self.all()?;
        Ok(ids.iter().collect::<HashSet<_>>().len())
    }

    /// Ledger file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
