//! A unit of work for the worker pool.

use reqwest::Url;

use crate::error::{Error, Result};
use crate::listing::zone_name;
use crate::sink::SinkTarget;

/// Represents one zone file to transfer and where to persist it.
#[derive(Debug, Clone)]
pub struct TransferJob {
    /// URL of the zone file to download.
    pub url: Url,
    /// Name of the zone, e.g. `com`.
    pub zone: String,
    /// Resolved destination.
    pub target: SinkTarget,
}

impl TransferJob {
    /// Build a job from a download link and the output root.
    ///
    /// The zone name is derived from the link and the destination from the
    /// output root, so a malformed link fails here instead of inside a
    /// worker.
    pub fn new(link: &str, output_root: &str) -> Result<Self> {
        let url = Url::parse(link)
            .map_err(|e| Error::InvalidUrl(format!("The url \"{link}\" cannot be parsed: {e}")))?;
        let zone = zone_name(&url)?;
        let target = SinkTarget::resolve(output_root, &zone)?;
        Ok(Self { url, zone, target })
    }
}
