//! HTTP client setup and middleware configuration.
//!
//! This module provides HTTP client creation with middleware configuration
//! including retry logic, tracing, proxy support, and custom headers. Two
//! client profiles exist: the API client (credential exchange and zone
//! listing) retries transient failures, while the transfer client (size
//! probes and chunk fetches) never retries, so a failed chunk fails its
//! download outright.
//!
//! # Examples
//!
//! ## API Client
//!
//! ```rust
//! use zonepull::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::api())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Transfer Client with Bearer Header
//!
//! ```rust
//! use zonepull::auth::AccessToken;
//! use zonepull::http::{create_http_client, HttpClientConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let token = AccessToken::new("opaque-token");
//! let config = HttpClientConfig::transfer(token.bearer_headers()?);
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Request timeout for the API client.
pub const API_TIMEOUT: Duration = Duration::from_secs(30);
/// Request timeout for the transfer client. Generous because a single chunk
/// of a large zone can take minutes on a slow link.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(120);

/// Configuration for HTTP client setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Number of retries for failed requests. Zero disables the retry
    /// middleware entirely.
    pub retries: u32,
    /// Total per-request timeout.
    pub timeout: Option<Duration>,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout: None,
            proxy: None,
            headers: None,
        }
    }
}

impl HttpClientConfig {
    /// Profile for the API client used by the credential exchange and the
    /// zone listing.
    pub fn api() -> Self {
        Self {
            retries: 3,
            timeout: Some(API_TIMEOUT),
            proxy: None,
            headers: None,
        }
    }

    /// Profile for the transfer client used by size probes and chunk
    /// fetches.
    ///
    /// Carries the bearer header on every request and never retries, so a
    /// chunk fetch failure is surfaced instead of silently re-fetched.
    pub fn transfer(headers: HeaderMap) -> Self {
        Self {
            retries: 0,
            timeout: Some(TRANSFER_TIMEOUT),
            proxy: None,
            headers: Some(headers),
        }
    }
}

/// Creates an HTTP client with middleware configuration.
///
/// The client is wrapped with:
/// - Tracing middleware for request/response logging
/// - Retry middleware with exponential backoff, when `retries > 0`
/// - Optional proxy support
/// - Optional default headers
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        inner_client_builder = inner_client_builder.timeout(timeout);
    }

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    let inner_client = inner_client_builder.build()?;

    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let mut client_builder = ClientBuilder::new(inner_client).with(TracingMiddleware::default());

    if config.retries > 0 {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.retries);
        client_builder =
            client_builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }

    Ok(client_builder.build())
}
