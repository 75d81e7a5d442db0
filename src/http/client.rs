//! HTTP client with retry and rate limiting
//!
//! Provides the Intercom client that handles:
//! - Bearer authentication and the fixed Intercom headers
//! - Automatic retries with configurable backoff
//! - Rate limiting to prevent API throttling
//! - Response body parsing

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::config::{TapConfig, API_VERSION, DEFAULT_API_URL};
use crate::error::{Error, Result};
use crate::request::PreparedRequest;
use crate::types::{BackoffType, JsonValue, Method};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the pinned API version
pub const VERSION_HEADER: &str = "Intercom-Version";

/// Configuration for the HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    /// API root all request paths are joined onto
    pub base_url: String,
    /// Bearer token
    pub access_token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            access_token: None,
            timeout: Duration::from_secs(60),
            max_retries: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::from([
                (VERSION_HEADER.to_string(), API_VERSION.to_string()),
                (CONTENT_TYPE.to_string(), "application/json".to_string()),
                (ACCEPT.to_string(), "application/json".to_string()),
            ]),
            user_agent: format!("tap-intercom/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl std::fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff_type", &self.backoff_type)
            .field("rate_limit", &self.rate_limit)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Client settings for a tap configuration
    pub fn from_tap_config(config: &TapConfig) -> Self {
        let mut builder = Self::builder()
            .base_url(&config.api_url)
            .bearer(config.token())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .max_retries(config.max_retries)
            .rate_limit(RateLimiterConfig::new(
                config.requests_per_second,
                config.requests_per_second,
            ));
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
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
        self.config.base_url = url.into();
        self
    }

    /// Set the bearer token
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.config.access_token = Some(token.into());
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

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    base_url: Url,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::invalid_value("api_url", e.to_string()))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(header_map(&config.default_headers)?)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            base_url,
            config,
            rate_limiter,
        })
    }

    /// Client for a tap configuration
    pub fn from_tap_config(config: &TapConfig) -> Result<Self> {
        Self::with_config(HttpClientConfig::from_tap_config(config))
    }

    /// API root
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a prepared request and parse the JSON response
    pub async fn execute(&self, request: &PreparedRequest) -> Result<JsonValue> {
        let url = request.url(&self.base_url)?;
        let response = self.request(request.method, url, request.body.as_ref()).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&text).map_err(|e| Error::decode(format!("Invalid JSON response: {e}")))
    }

    /// GET a path below the API root and parse the JSON response
    pub async fn get_json(&self, path: &str) -> Result<JsonValue> {
        self.execute(&PreparedRequest {
            method: Method::GET,
            path: path.to_string(),
            query: Vec::new(),
            body: None,
        })
        .await
    }

    /// Make a request, retrying transient failures
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        body: Option<&JsonValue>,
    ) -> Result<Response> {
        let max_retries = self.config.max_retries;
        let timeout = self.config.timeout;

        let mut last_error = None;
        let mut attempt = 0;

        while attempt <= max_retries {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self.client.request(method.into(), url.clone());
            if let Some(token) = &self.config.access_token {
                req = req.bearer_auth(token);
            }
            if let Some(body) = body {
                req = req.json(body);
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = extract_retry_after(&response);
                        if attempt < max_retries {
                            warn!(
                                "Rate limited (429), attempt {}/{}, waiting {}s",
                                attempt + 1,
                                max_retries + 1,
                                retry_after
                            );
                            tokio::time::sleep(Duration::from_secs(retry_after)).await;
                            attempt += 1;
                            continue;
                        }
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after,
                        });
                    }

                    let status_error = Error::http_status(status.as_u16(), "");
                    if status_error.is_retryable() && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(status_error);
                        continue;
                    }

                    if status.is_client_error() || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::http_status(status.as_u16(), body));
                    }

                    debug!("Request succeeded: {} {}", method, url);
                    return Ok(response);
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Request error ({}), attempt {}/{}, retrying in {:?}",
                            e,
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        last_error = Some(if e.is_timeout() {
                            Error::Timeout {
                                timeout_ms: timeout.as_millis() as u64,
                            }
                        } else {
                            Error::Http(e)
                        });
                        continue;
                    }

                    if e.is_timeout() {
                        return Err(Error::Timeout {
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }
                    return Err(Error::Http(e));
                }
            }
        }

        Err(last_error.unwrap_or(Error::MaxRetriesExceeded { max_retries }))
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::config(format!("Invalid header name '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::config(format!("Invalid value for header '{key}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60)
}
