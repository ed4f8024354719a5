//! CUZK REST API client with rate limiting and retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use url::Url;

use crate::error::CuzkError;
use crate::rate_limit::RateLimiter;
use crate::retry::{is_retryable_error, is_retryable_status, RetryDecision, RetryPolicy};

pub const CUZK_API_BASE: &str = "https://api-kn.cuzk.gov.cz/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const API_KEY_HEADER: &str = "Api-Key";
const USER_AGENT: &str = concat!("katastr/", env!("CARGO_PKG_VERSION"));

/// Client settings resolved by the configuration loader.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Sent as `Api-Key`; without it the registry answers 401.
    pub api_key: Option<String>,
    /// Per-attempt HTTP timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = (!key.is_empty()).then_some(key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(CUZK_API_BASE)
    }
}

/// A single read against the API: path plus ordered query pairs.
///
/// Repeated keys are kept, which the polygon endpoint relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    path: String,
    query: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(&'static str, String)] {
        &self.query
    }
}

/// CUZK API client.
///
/// Cheap to share behind an `Arc`; all callers contend for the injected
/// [`RateLimiter`].
#[derive(Debug, Clone)]
pub struct CuzkClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl CuzkClient {
    pub fn new(config: ClientConfig, limiter: Arc<RateLimiter>) -> Result<Self, CuzkError> {
        Url::parse(&config.base_url)
            .map_err(|e| CuzkError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(CuzkError::ClientBuild)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            client,
            limiter,
            retry: config.retry,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Performs a paced, retried GET and decodes the JSON body into `T`.
    #[instrument(skip(self, cancel, request), fields(path = %request.path), level = "debug")]
    pub async fn get<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        request: &UpstreamRequest,
    ) -> Result<T, CuzkError> {
        let body = self.execute(cancel, request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Returns the raw body of a 200 response.
    async fn execute(
        &self,
        cancel: &CancellationToken,
        request: &UpstreamRequest,
    ) -> Result<Vec<u8>, CuzkError> {
        let url = self.url_for(request)?;
        self.limiter.acquire(cancel).await?;

        let max_attempts = self.retry.max_attempts;
        let mut attempt = 1;
        loop {
            match self.attempt(cancel, &url, request, attempt).await {
                Ok(body) => {
                    if attempt > 1 {
                        tracing::info!("Request succeeded after {} attempts", attempt);
                    }
                    return Ok(body);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    attempt += 1;
                    let delay = self.retry.delay_before(attempt);
                    tracing::warn!(
                        "Retryable error: {}; attempt {} of {} in {:?}",
                        e,
                        attempt,
                        max_attempts,
                        delay
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            tracing::debug!("Backoff wait cancelled");
                            return Err(CuzkError::Cancelled);
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) if e.is_retryable() => {
                    tracing::error!("All {} attempts exhausted: {}", max_attempts, e);
                    return Err(CuzkError::RetriesExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn attempt(
        &self,
        cancel: &CancellationToken,
        url: &Url,
        request: &UpstreamRequest,
        attempt: u32,
    ) -> Result<Vec<u8>, CuzkError> {
        let max_attempts = self.retry.max_attempts;

        let mut builder = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .query(request.query_pairs());
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let call = async {
            let response = builder.send().await.map_err(|source| {
                match is_retryable_error(&source) {
                    RetryDecision::Retry => CuzkError::Transport {
                        attempt,
                        max_attempts,
                        source,
                    },
                    RetryDecision::NoRetry => CuzkError::Request(source),
                }
            })?;

            let status = response.status();
            let body = response.bytes().await.map_err(|source| CuzkError::BodyRead {
                attempt,
                max_attempts,
                source,
            })?;

            if is_retryable_status(status) == RetryDecision::Retry {
                return Err(CuzkError::RetryableStatus {
                    status: status.as_u16(),
                    attempt,
                    max_attempts,
                });
            }

            if status != StatusCode::OK {
                return Err(CuzkError::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).into_owned(),
                });
            }

            Ok(body.to_vec())
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CuzkError::Cancelled),
            result = call => result,
        }
    }

    fn url_for(&self, request: &UpstreamRequest) -> Result<Url, CuzkError> {
        let raw = format!("{}{}", self.base_url, request.path);
        Url::parse(&raw).map_err(|e| CuzkError::InvalidUrl(format!("{}: {}", raw, e)))
    }
}
