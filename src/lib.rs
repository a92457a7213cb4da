//! Zonepull is a crate for bulk retrieval of DNS zone files from ICANN's
//! Centralized Zone Data Service, downloading each zone in parallel byte
//! ranges and persisting it to the local filesystem or an S3 bucket.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use zonepull::auth::{authenticate, DEFAULT_AUTH_URL};
//! use zonepull::downloader::DownloaderBuilder;
//! use zonepull::http::{create_http_client, HttpClientConfig};
//! use zonepull::listing::{zone_links, DEFAULT_API_BASE_URL};
//! use zonepull::pool::{Dispatcher, PoolConfig};
//! use zonepull::sink::{RetryPolicy, Sink};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let api = create_http_client(HttpClientConfig::api())?;
//! let token = authenticate(&api, DEFAULT_AUTH_URL, "user@example.com", "hunter2").await?;
//!
//! let transfer = create_http_client(HttpClientConfig::transfer(token.bearer_headers()?))?;
//! let links = zone_links(&transfer, DEFAULT_API_BASE_URL).await?;
//! let downloader = DownloaderBuilder::new().chunk_count(2).build();
//! let sink = Sink::for_root("./czds", RetryPolicy::default()).await?;
//!
//! let dispatcher = Dispatcher::new(PoolConfig::default(), transfer, downloader, sink, "./czds");
//! let report = dispatcher.run(&links, &CancellationToken::new()).await;
//! println!("{} zone(s) saved, {} failed", report.succeeded(), report.failed());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! The zonepull crate is organized into several modules:
//!
//! - [`auth`] - Credential exchange against the ICANN account API
//! - [`chunk`] - Byte-range planning and single-range fetching
//! - [`downloader`] - The chunked `Downloader` and its builder
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`http`] - HTTP client profiles and middleware
//! - [`listing`] - Zone link discovery and naming
//! - [`pool`] - The worker pool dispatching many transfers
//! - [`progress`] - Progress bar styling and display management
//! - [`sink`] - Pluggable persistence for assembled zones
//! - [`utils`] - Shared utility functions

pub mod auth;
pub mod chunk;
pub mod downloader;
pub mod error;
pub mod http;
pub mod listing;
pub mod pool;
pub mod progress;
pub mod sink;
pub mod utils;

pub use auth::AccessToken;
pub use chunk::{plan_chunks, ChunkResult, ChunkSpec};
pub use downloader::{AssembledZone, Downloader, DownloaderBuilder, DownloaderConfig};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
pub use pool::{Dispatcher, PoolConfig, RunOutcome, RunReport, Status, Summary, TransferJob};
pub use progress::{ProgressBarOpts, ProgressDisplay, StyleOptions};
pub use sink::{LocalFileSink, ObjectStoreSink, RetryPolicy, Sink, SinkTarget};
pub use utils::content_length::{get_content_length, parse_content_range_total};
