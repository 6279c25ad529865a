//! W3C WebDriver session over HTTP
//!
//! Speaks the WebDriver wire protocol directly with `reqwest`:
//! `POST /session`, `POST /session/{id}/url`, `GET /session/{id}/source`,
//! `POST /session/{id}/execute/sync` and `DELETE /session/{id}`.
//! Navigation is paced by a rate limiter so a long year range does not
//! hammer the archive.

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::browser::ListingSession;
use crate::config::WebdriverConfig;
use crate::utils::error::SessionError;
use crate::utils::retry::{with_retry, RetryConfig};

/// Script sent to the browser to trigger infinite-scroll growth
const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Active WebDriver session
///
/// The session holds remote browser state; callers must invoke
/// [`close`](Self::close) on every exit path. Dropping an unclosed
/// session only logs a warning, it cannot release the remote end.
pub struct WebdriverSession {
    /// HTTP client with configured timeout
    client: reqwest::Client,

    /// WebDriver server endpoint without trailing slash
    endpoint: String,

    /// Session id assigned by the server
    session_id: String,

    /// Rate limiter applied to navigations
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Set once DELETE /session succeeded
    closed: AtomicBool,
}

impl WebdriverSession {
    /// Create a new session against the configured WebDriver server
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Http` if the server is unreachable and
    /// `SessionError::Protocol` if it rejects the session request.
    pub async fn connect(config: &WebdriverConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let endpoint = config.url.trim_end_matches('/').to_string();

        let mut chrome_args = vec!["--disable-gpu", "--window-size=1920,1080"];
        if config.headless {
            chrome_args.push("--headless=new");
        }

        let capabilities = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": chrome_args }
                }
            }
        });

        let body = Self::unwrap_value(
            client
                .post(format!("{endpoint}/session"))
                .json(&capabilities)
                .send()
                .await?,
        )
        .await?;

        let session_id = body
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| SessionError::MalformedResponse("sessionId missing".into()))?
            .to_string();

        let rate = NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::new(1).unwrap());
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        tracing::info!(session_id = %session_id, endpoint = %endpoint, "WebDriver session created");

        Ok(Self {
            client,
            endpoint,
            session_id,
            rate_limiter,
            closed: AtomicBool::new(false),
        })
    }

    /// Create a session, retrying with exponential backoff
    ///
    /// Session bootstrap is the one fatal step of a run; the retry
    /// window gives a still-starting chromedriver a chance to come up
    /// before the run is abandoned.
    pub async fn connect_with_retry(config: &WebdriverConfig) -> anyhow::Result<Self> {
        let retry = RetryConfig::new(config.connect_retries);
        with_retry(&retry, || async {
            Self::connect(config).await.map_err(anyhow::Error::from)
        })
        .await
    }

    /// End the session on the remote server
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the DELETE round trip fails; the caller
    /// should log and continue, the process is exiting anyway.
    pub async fn close(&self) -> Result<(), SessionError> {
        let url = format!("{}/session/{}", self.endpoint, self.session_id);
        Self::unwrap_value(self.client.delete(url).send().await?).await?;
        self.closed.store(true, Ordering::Release);
        tracing::info!(session_id = %self.session_id, "WebDriver session closed");
        Ok(())
    }

    /// Unwrap a WebDriver response into its `value` field
    ///
    /// Error responses carry `{"value": {"error", "message"}}` and are
    /// surfaced as `SessionError::Protocol`.
    async fn unwrap_value(response: reqwest::Response) -> Result<Value, SessionError> {
        let status = response.status();
        let body: Value = response.json().await?;

        let value = body
            .get("value")
            .cloned()
            .ok_or_else(|| SessionError::MalformedResponse("value field missing".into()))?;

        if !status.is_success() {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(SessionError::Protocol { error, message });
        }

        Ok(value)
    }

    /// Session-scoped command URL
    fn command_url(&self, command: &str) -> String {
        format!("{}/session/{}/{command}", self.endpoint, self.session_id)
    }
}

#[async_trait]
impl ListingSession for WebdriverSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %url, "Navigating");
        Self::unwrap_value(
            self.client
                .post(self.command_url("url"))
                .json(&json!({ "url": url }))
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        let value =
            Self::unwrap_value(self.client.get(self.command_url("source")).send().await?).await?;

        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SessionError::MalformedResponse("source is not a string".into()))
    }

    async fn load_more(&self) -> Result<(), SessionError> {
        Self::unwrap_value(
            self.client
                .post(self.command_url("execute/sync"))
                .json(&json!({ "script": SCROLL_SCRIPT, "args": [] }))
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }
}

impl Drop for WebdriverSession {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Acquire) {
            tracing::warn!(
                session_id = %self.session_id,
                "WebDriver session dropped without close; remote browser may linger"
            );
        }
    }
}
