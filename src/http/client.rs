//! HTTP client used by the store
//!
//! Every attempt is authenticated and optionally rate limited. With
//! `max_retries > 0`, throttling (429), transient 5xx responses, timeouts
//! and connection errors are retried with exponential backoff.

use super::rate_limit::RateLimiter;
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{Error, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent sent with every request
const USER_AGENT: &str = concat!("firestore-seed/", env!("CARGO_PKG_VERSION"));

/// Configuration for the HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientConfig {
    /// Base URL that request paths are joined onto
    pub base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt (0 = a single attempt)
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub initial_backoff: Duration,
    /// Upper bound for the backoff delay
    pub max_backoff: Duration,
    /// Maximum requests per second
    pub rate_limit: Option<NonZeroU32>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 0,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(30),
            rate_limit: None,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Limit the client to `per_second` requests per second
    pub fn rate_limit(mut self, per_second: NonZeroU32) -> Self {
        self.config.rate_limit = Some(per_second);
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Authenticated JSON client for the Firestore REST API
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a client that authenticates with `auth_config`
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(Error::Http)?;

        let rate_limiter = config.rate_limit.map(RateLimiter::per_second);
        let authenticator = Authenticator::with_client(auth_config, client.clone());

        Ok(Self {
            client,
            config,
            authenticator,
            rate_limiter,
        })
    }

    /// POST a JSON body and parse the JSON response
    ///
    /// A non-success status that is not retried, or that is still failing
    /// once retries run out, becomes `Error::HttpStatus` carrying the
    /// response body untouched.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T> {
        let response = self.post(path, &body).await?;
        response.json().await.map_err(Error::Http)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Response> {
        let url = self.build_url(path);
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let request = self.client.post(&url).json(body);
            let request = self.authenticator.apply(request).await?;
            let retries_left = attempt < max_retries;

            let delay = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        debug!(%url, status = status.as_u16(), "Request succeeded");
                        return Ok(response);
                    }
                    if !retries_left || !is_retryable_status(status) {
                        let text = response.text().await.unwrap_or_default();
                        return Err(Error::http_status(status.as_u16(), text));
                    }
                    warn!(
                        status = status.as_u16(),
                        attempt = attempt + 1,
                        max_attempts = max_retries + 1,
                        "Request failed, retrying"
                    );
                    retry_after(&response).unwrap_or_else(|| self.calculate_backoff(attempt))
                }
                Err(e) if e.is_timeout() => {
                    if !retries_left {
                        return Err(Error::Timeout {
                            timeout_ms: self.config.timeout.as_millis() as u64,
                        });
                    }
                    warn!(attempt = attempt + 1, "Request timed out, retrying");
                    self.calculate_backoff(attempt)
                }
                Err(e) if e.is_connect() && retries_left => {
                    warn!(attempt = attempt + 1, error = %e, "Connection failed, retrying");
                    self.calculate_backoff(attempt)
                }
                Err(e) => return Err(Error::Http(e)),
            };

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Join a path onto the base URL; absolute URLs pass through
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Delay before retry number `attempt + 1`: `initial * 2^attempt`, capped
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = self
            .config
            .initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || matches!(status.as_u16(), 500 | 502 | 503 | 504)
}

/// Server-requested delay from a `retry-after` header in seconds
fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .map(Duration::from_secs)
}
