//! Builder pattern implementation for creating Downloader instances.

use super::{config::DownloaderConfig, downloader::Downloader};

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// use zonepull::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().chunk_count(8).build();
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Set the number of ranges each resource is divided into.
    ///
    /// The planner may emit fewer ranges for small resources; see
    /// [`plan_chunks`](crate::chunk::plan_chunks).
    pub fn chunk_count(mut self, chunk_count: usize) -> Self {
        self.config.chunk_count = chunk_count;
        self
    }

    /// Use range requests to get content length instead of HEAD requests.
    ///
    /// This is useful when servers don't provide accurate Content-Length headers
    /// in HEAD requests but do support range requests with Content-Range responses.
    pub fn use_range_for_content_length(mut self, use_range: bool) -> Self {
        self.config.use_range_for_content_length = use_range;
        self
    }

    /// Create the [`Downloader`] with the configured options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}
