//! HTTP client module
//!
//! Provides the Intercom HTTP client with retry, rate limiting, and backoff.
//!
//! # Features
//!
//! - **Authentication**: `Authorization: Bearer <access_token>`
//! - **Fixed headers**: `Intercom-Version`, JSON content type, optional
//!   `User-Agent` override
//! - **Automatic Retries**: 429/5xx/timeouts with backoff, honouring
//!   `Retry-After`
//! - **Rate Limiting**: Token bucket rate limiter using governor

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, VERSION_HEADER};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
