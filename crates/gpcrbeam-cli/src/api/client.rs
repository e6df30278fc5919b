//! HTTP API client for GPCRdb
//!
//! Issues GET requests against the GPCRdb REST API, retrying transient failures
//! according to a [`RetryPolicy`].

use crate::api::retry::{parse_retry_after, RetryPolicy, DEFAULT_BACKOFF_FACTOR};
use crate::api::{endpoints, types::Receptor};
use crate::config::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::error::{CliError, Result};
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("gpcrbeam/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`GpcrdbClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    backoff_factor: Duration,
}

impl ClientConfig {
    /// Settings for `base_url` with default timeout, retries and backoff
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }

    /// Per-attempt timeout in seconds (non-finite or non-positive values are ignored)
    pub fn with_timeout_secs(mut self, secs: f64) -> Self {
        if let Ok(timeout) = Duration::try_from_secs_f64(secs) {
            if !timeout.is_zero() {
                self.timeout = timeout;
            }
        }
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff_factor(mut self, factor: Duration) -> Self {
        self.backoff_factor = factor;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff_factor(&self) -> Duration {
        self.backoff_factor
    }

    /// Retry policy derived from these settings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries).with_backoff_factor(self.backoff_factor)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// API client for GPCRdb
pub struct GpcrdbClient {
    client: Client,
    config: ClientConfig,
    retry: RetryPolicy,
}

impl GpcrdbClient {
    /// Create a new API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CliError::config(format!("failed to build HTTP client: {}", e)))?;

        let retry = config.retry_policy();
        Ok(Self {
            client,
            config,
            retry,
        })
    }

    /// Fetch every receptor from `/receptorlist/` and normalize it
    pub async fn get_receptor_list(&self) -> Result<Vec<Receptor>> {
        let payloads = self.get_receptor_payloads().await?;
        let receptors: Vec<Receptor> = payloads.iter().map(Receptor::from_api).collect();
        debug!(count = receptors.len(), "Normalized receptor records");
        Ok(receptors)
    }

    /// Fetch the raw `/receptorlist/` payloads without normalization
    pub async fn get_receptor_payloads(&self) -> Result<Vec<Value>> {
        let url = endpoints::receptor_list_url(self.config.base_url());
        let body = self.get_text(&url).await?;

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(CliError::decode(format!(
                "expected a JSON array from {}, got {}",
                url,
                json_kind(&other)
            ))),
            Err(e) => Err(CliError::decode(format!("invalid JSON from {}: {}", url, e))),
        }
    }

    /// GET a URL and return the body, retrying per the policy
    async fn get_text(&self, url: &str) -> Result<String> {
        let mut retries_done = 0;

        loop {
            let attempt = retries_done + 1;
            debug!(url = %url, attempt = attempt, "GET");

            let failure = match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        match response.text().await {
                            Ok(body) => return Ok(body),
                            Err(e) => AttemptFailure::Transport(e.to_string()),
                        }
                    } else if self.retry.is_retryable_status(status.as_u16()) {
                        let retry_after = if self.retry.honours_retry_after(status.as_u16()) {
                            response
                                .headers()
                                .get(RETRY_AFTER)
                                .and_then(|v| v.to_str().ok())
                                .and_then(parse_retry_after)
                        } else {
                            None
                        };
                        AttemptFailure::Status(status.as_u16(), retry_after)
                    } else {
                        return Err(CliError::http_status(status.as_u16(), url));
                    }
                },
                Err(e) if e.is_builder() => {
                    return Err(CliError::config(format!("invalid request URL '{}': {}", url, e)));
                },
                Err(e) => AttemptFailure::Transport(e.to_string()),
            };

            match self.retry.next_delay(retries_done, failure.retry_after()) {
                Some(delay) => {
                    warn!(
                        url = %url,
                        attempt = attempt,
                        max_attempts = self.retry.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        reason = %failure,
                        "Request failed, retrying..."
                    );
                    tokio::time::sleep(delay).await;
                    retries_done += 1;
                },
                None => {
                    return Err(CliError::network(format!(
                        "GET {} failed after {} attempt(s): {}",
                        url, attempt, failure
                    )));
                },
            }
        }
    }
}

/// Why a single attempt failed in a retryable way
#[derive(Debug)]
enum AttemptFailure {
    Status(u16, Option<Duration>),
    Transport(String),
}

impl AttemptFailure {
    fn retry_after(&self) -> Option<Duration> {
        match self {
            AttemptFailure::Status(_, after) => *after,
            AttemptFailure::Transport(_) => None,
        }
    }
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptFailure::Status(status, _) => write!(f, "HTTP {}", status),
            AttemptFailure::Transport(msg) => f.write_str(msg),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
