// Core data structures for the pamyat collector

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Axis used to enumerate the photo listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryType {
    /// Enumerate by calendar year (`?year=...`)
    Year,
    /// Enumerate by person name (`?find=...`)
    Find,
}

impl QueryType {
    /// URL query parameter name used by the archive
    pub fn param(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Find => "find",
        }
    }

    /// Noun used in output file names (`ids_years.txt`, `count_ids_by_name.json`)
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Find => "name",
        }
    }

    /// Create from string (accepts both the query parameter and the noun)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "year" | "years" => Some(Self::Year),
            "find" | "name" | "names" => Some(Self::Find),
            _ => None,
        }
    }

    /// Get all query types in run order
    pub fn all() -> Vec<Self> {
        vec![Self::Year, Self::Find]
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.param())
    }
}

/// One concrete instance along a query type: a year or a person name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryValue {
    Year(u16),
    Name(String),
}

impl QueryValue {
    /// Build the year sequence for a half-open range
    pub fn years(start: u16, end: u16) -> Vec<Self> {
        (start..end).map(Self::Year).collect()
    }

    /// Build the name sequence from harvested strings
    pub fn names<I: IntoIterator<Item = String>>(names: I) -> Vec<Self> {
        names.into_iter().map(Self::Name).collect()
    }
}

impl std::fmt::Display for QueryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// How the stability loop terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityVerdict {
    /// The rendered set stopped growing
    Stable,
    /// The iteration or wall-clock cap was hit before stability
    TimedOut,
}

impl std::fmt::Display for StabilityVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stable => write!(f, "stable"),
            Self::TimedOut => write!(f, "timed_out"),
        }
    }
}

/// Stabilized identifier set for one query value
///
/// The null sentinel (an item element without an identifier attribute)
/// is never admitted into `ids`, so `count()` is always the number of
/// distinct real identifiers, even for a listing that stabilized empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Distinct non-null record identifiers
    pub ids: BTreeSet<String>,
    /// How the loop terminated
    pub verdict: StabilityVerdict,
}

impl QueryResult {
    pub fn new(ids: BTreeSet<String>, verdict: StabilityVerdict) -> Self {
        Self { ids, verdict }
    }

    /// Number of distinct non-null identifiers observed at termination
    pub fn count(&self) -> usize {
        self.ids.len()
    }
}
