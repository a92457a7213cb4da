//! Local filesystem persistence.

use std::path::Path;
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use crate::downloader::AssembledZone;
use crate::error::Result;

/// Writes assembled zones to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSink;

impl LocalFileSink {
    /// Persist `zone` at `path`, creating parent directories as needed.
    ///
    /// An existing file is truncated. Returns the number of bytes written.
    pub async fn save(&self, path: &Path, zone: AssembledZone) -> Result<u64> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        debug!("Writing {} byte(s) to {:?}", zone.len(), path);
        let mut file = fs::File::create(path).await?;
        let total = zone.len();
        for mut chunk in zone.into_chunks() {
            file.write_all_buf(&mut chunk).await?;
        }
        file.sync_all().await?;
        Ok(total)
    }
}
