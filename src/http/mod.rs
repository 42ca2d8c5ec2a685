//! HTTP transport module
//!
//! Provides the transport collaborator used by the version resolver, the
//! pagination reconciler and the service clients.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Per-server clients**: base URL, `X-Api-Key` header and TLS verification
//!   flag are fixed at construction

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, RequestConfig, API_KEY_HEADER};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

use crate::error::Result;
use crate::types::Method;
use async_trait::async_trait;
use serde_json::Value;

/// Fetches a decoded JSON body for a prepared request.
///
/// Any `Err` means "no usable data this cycle": unreachable server, timeout,
/// non-2xx status or a body that is not JSON.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue `method path` with the given query/headers and decode the body
    async fn fetch(&self, method: Method, path: &str, config: RequestConfig) -> Result<Value>;
}
