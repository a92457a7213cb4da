//! HTTP module containing HTTP client functionality.
//!
//! This module provides HTTP client setup and configuration. Client
//! creation handles retry logic, tracing, proxy support, and default
//! headers; the [`HttpClientConfig::api`] and [`HttpClientConfig::transfer`]
//! profiles capture the two policies the rest of the crate relies on.
//!
//! # Examples
//!
//! ```rust
//! use zonepull::http::{create_http_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "zonepull/0.3".parse()?);
//!
//! let config = HttpClientConfig {
//!     headers: Some(headers),
//!     ..HttpClientConfig::api()
//! };
//!
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{create_http_client, HttpClientConfig, API_TIMEOUT, TRANSFER_TIMEOUT};
