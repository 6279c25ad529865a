//! Configuration management for the pamyat collector
//!
//! This module handles loading and validating configuration from environment
//! variables, files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::QueryType;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Archive endpoints and query ranges
    pub scrape: ScrapeConfig,

    /// Stability-detection loop caps
    pub stability: StabilityConfig,

    /// WebDriver session configuration
    pub webdriver: WebdriverConfig,

    /// Output locations
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Archive endpoints and query ranges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Photo listing base URL (query parameters are appended)
    pub listing_url: String,

    /// Name directory page with the alphabet index
    pub directory_url: String,

    /// First year to query (inclusive)
    pub year_start: u16,

    /// Last year to query (exclusive)
    pub year_end: u16,
}

/// Stability-detection loop caps
///
/// The loop pauses `poll_interval` between growth triggers and gives up
/// with a `TimedOut` verdict once either cap is reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Pause between scroll triggers in milliseconds
    pub poll_interval_ms: u64,

    /// Maximum loop iterations per query value
    pub max_iterations: u32,

    /// Maximum wall-clock time per query value in seconds
    pub max_duration_secs: u64,
}

impl StabilityConfig {
    /// Get the poll interval as Duration
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get the wall-clock cap as Duration
    #[must_use]
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

/// WebDriver session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebdriverConfig {
    /// WebDriver server endpoint (chromedriver or compatible)
    pub url: String,

    /// Run the browser headless
    pub headless: bool,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Navigation rate limit (navigations per second)
    pub rate_limit: u32,

    /// Session-creation retry attempts before the run aborts
    pub connect_retries: u32,
}

impl WebdriverConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for collected data
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Ledger file for a query type: `{data_dir}/ids/ids_{noun}s.txt`
    #[must_use]
    pub fn ledger_path(&self, query_type: QueryType) -> PathBuf {
        self.data_dir
            .join("ids")
            .join(format!("ids_{}s.txt", query_type.noun()))
    }

    /// Count map file for a query type: `{data_dir}/other/count_ids_by_{noun}.json`
    #[must_use]
    pub fn counts_path(&self, query_type: QueryType) -> PathBuf {
        self.data_dir
            .join("other")
            .join(format!("count_ids_by_{}.json", query_type.noun()))
    }

    /// Harvested name list: `{data_dir}/other/names.txt`
    #[must_use]
    pub fn names_path(&self) -> PathBuf {
        self.data_dir.join("other").join("names.txt")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let listing_url = std::env::var("PAMYAT_LISTING_URL")
            .unwrap_or_else(|_| String::from("https://foto.pamyat-naroda.ru/"));

        let directory_url = std::env::var("PAMYAT_DIRECTORY_URL")
            .unwrap_or_else(|_| String::from("https://foto.pamyat-naroda.ru/heroes"));

        let year_start = std::env::var("PAMYAT_YEAR_START")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(1874);

        let year_end = std::env::var("PAMYAT_YEAR_END")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(2000);

        let poll_interval_ms = std::env::var("PAMYAT_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(1000);

        let max_iterations = std::env::var("PAMYAT_MAX_ITERATIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(500);

        let max_duration_secs = std::env::var("PAMYAT_MAX_DURATION")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(900);

        let webdriver_url = std::env::var("PAMYAT_WEBDRIVER_URL")
            .unwrap_or_else(|_| String::from("http://localhost:9515"));

        let headless = std::env::var("PAMYAT_HEADLESS")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(true);

        let request_timeout_secs = std::env::var("PAMYAT_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let rate_limit = std::env::var("PAMYAT_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(2);

        let connect_retries = std::env::var("PAMYAT_CONNECT_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let data_dir = std::env::var("PAMYAT_DATA_DIR")
            .unwrap_or_else(|_| String::from("data"))
            .into();

        let log_level = std::env::var("PAMYAT_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("PAMYAT_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            scrape: ScrapeConfig {
                listing_url,
                directory_url,
                year_start,
                year_end,
            },
            stability: StabilityConfig {
                poll_interval_ms,
                max_iterations,
                max_duration_secs,
            },
            webdriver: WebdriverConfig {
                url: webdriver_url,
                headless,
                request_timeout_secs,
                rate_limit,
                connect_retries,
            },
            storage: StorageConfig { data_dir },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scrape.year_start >= self.scrape.year_end {
            anyhow::bail!("year_start must be before year_end");
        }

        if self.stability.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than 0");
        }

        if self.stability.max_iterations == 0 {
            anyhow::bail!("max_iterations must be greater than 0");
        }

        if self.stability.max_duration_secs == 0 {
            anyhow::bail!("max_duration_secs must be greater than 0");
        }

        if self.webdriver.rate_limit == 0 {
            anyhow::bail!("rate_limit must be greater than 0");
        }

        url::Url::parse(&self.scrape.listing_url).context("listing_url is not a valid URL")?;
        url::Url::parse(&self.scrape.directory_url).context("directory_url is not a valid URL")?;
        url::Url::parse(&self.webdriver.url).context("webdriver url is not a valid URL")?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scrape: ScrapeConfig {
                listing_url: String::from("https://foto.pamyat-naroda.ru/"),
                directory_url: String::from("https://foto.pamyat-naroda.ru/heroes"),
                year_start: 1874,
                year_end: 2000,
            },
            stability: StabilityConfig {
                poll_interval_ms: 1000,
                max_iterations: 500,
                max_duration_secs: 900,
            },
            webdriver: WebdriverConfig {
                url: String::from("http://localhost:9515"),
                headless: true,
                request_timeout_secs: 30,
                rate_limit: 2,
                connect_retries: 3,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
