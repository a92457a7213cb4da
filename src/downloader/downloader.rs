//! Core downloader implementation with chunked fetch logic.
//!
//! This module contains the main [`Downloader`] struct that transfers a
//! single sized resource by splitting it into byte ranges, fetching the
//! ranges in parallel, and reassembling them in plan order.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reqwest::Url;
//! use tokio_util::sync::CancellationToken;
//! use zonepull::downloader::DownloaderBuilder;
//! use zonepull::http::{create_http_client, HttpClientConfig};
//! use zonepull::progress::{ProgressDisplay, StyleOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::api())?;
//! let downloader = DownloaderBuilder::new().chunk_count(4).build();
//! let progress = ProgressDisplay::new(StyleOptions::default(), 1, true);
//! let url = Url::parse("https://example.com/com.txt.gz")?;
//!
//! let zone = downloader
//!     .download(&client, &url, &progress, &CancellationToken::new())
//!     .await?;
//! progress.finish();
//! println!("fetched {} bytes", zone.len());
//! # Ok(())
//! # }
//! ```

use super::assembled::AssembledZone;
use super::config::DownloaderConfig;
use crate::chunk::{fetch::fetch_chunk, plan_chunks};
use crate::error::{Error, Result};
use crate::progress::display::ProgressDisplay;
use crate::utils::content_length::{get_content_length, get_content_range_total};

use bytes::Bytes;
use reqwest::header::RANGE;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::fmt::Debug;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Represents the transfer engine for one resource.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use zonepull::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Gets the number of ranges each resource is divided into.
    pub fn chunk_count(&self) -> usize {
        self.config.chunk_count
    }

    /// Gets whether to use range requests for content length.
    pub fn use_range_for_content_length(&self) -> bool {
        self.config.use_range_for_content_length
    }

    /// Transfers `url` into memory.
    ///
    /// Probes the resource size, plans the byte ranges, fetches them in
    /// parallel, and reassembles the payload in plan order no matter in
    /// which order the ranges arrive. Any failed range fails the whole
    /// transfer; a zero-length resource short-circuits to an empty zone
    /// without issuing range requests.
    ///
    /// Cancelling `cancel` aborts the outstanding range fetches and
    /// returns [`Error::Cancelled`].
    pub async fn download(
        &self,
        client: &ClientWithMiddleware,
        url: &Url,
        progress: &ProgressDisplay,
        cancel: &CancellationToken,
    ) -> Result<AssembledZone> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let total_size = self.probe_size(client, url).await?;
        let pb = progress.create_child_progress(total_size, 0);

        if total_size == 0 {
            debug!("{url} is empty, nothing to fetch");
            progress.finish_child(pb);
            return Ok(AssembledZone::empty());
        }

        let specs = plan_chunks(total_size, self.config.chunk_count);
        debug!(
            "Fetching {url} ({total_size} bytes) in {} range(s)",
            specs.len()
        );

        let expected = specs.len();
        let mut tasks = JoinSet::new();
        for spec in specs {
            tasks.spawn(fetch_chunk(client.clone(), url.clone(), spec, pb.clone()));
        }

        let mut slots: Vec<Option<Bytes>> = vec![None; expected];
        let mut received = 0;
        while received < expected {
            let joined = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tasks.abort_all();
                    return Err(Error::Cancelled);
                }
                joined = tasks.join_next() => joined,
            };
            match joined {
                Some(Ok(Ok(chunk))) => {
                    slots[chunk.index] = Some(chunk.bytes);
                    received += 1;
                }
                Some(Ok(Err(e))) => {
                    tasks.abort_all();
                    return Err(e);
                }
                Some(Err(e)) => {
                    tasks.abort_all();
                    return Err(Error::Internal(format!("range task failed: {e}")));
                }
                None => {
                    return Err(Error::Internal("range tasks ended early".to_string()));
                }
            }
        }

        progress.finish_child(pb);

        let mut chunks = Vec::with_capacity(expected);
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(bytes) => chunks.push(bytes),
                None => {
                    return Err(Error::Internal(format!(
                        "range {index} missing after collection"
                    )))
                }
            }
        }
        Ok(AssembledZone::from_ordered_chunks(chunks))
    }

    /// Get the resource size using either a HEAD request or a range request
    /// based on configuration.
    async fn probe_size(&self, client: &ClientWithMiddleware, url: &Url) -> Result<u64> {
        let size = if self.config.use_range_for_content_length {
            let response = client
                .get(url.as_str())
                .header(RANGE, "bytes=0-0")
                .send()
                .await?;
            response.error_for_status_ref()?;
            get_content_range_total(&response)
        } else {
            let response = client.head(url.as_str()).send().await?;
            response.error_for_status_ref()?;
            get_content_length(&response)
        };

        size.ok_or_else(|| Error::SizeUnavailable {
            url: url.to_string(),
        })
    }
}
