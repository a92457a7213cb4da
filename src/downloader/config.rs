//! Configuration structure and defaults for the downloader.
//!
//! [`DownloaderConfig`] carries the knobs governing how a single resource is
//! transferred. Instances are normally produced through the
//! [`DownloaderBuilder`](crate::downloader::DownloaderBuilder).

/// Configuration structure for the downloader
#[derive(Clone, Debug)]
pub struct DownloaderConfig {
    /// Number of ranges a resource is divided into.
    pub chunk_count: usize,
    /// Use range requests to get content length instead of HEAD requests.
    pub use_range_for_content_length: bool,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            chunk_count: 5,
            use_range_for_content_length: false,
        }
    }
}
