//! Pluggable persistence for assembled zones.
//!
//! A [`Sink`] hides where zone files end up. The backend is chosen once
//! from the output root: roots starting with `s3://` persist to an object
//! store, everything else to the local filesystem. Each job's concrete
//! destination is a [`SinkTarget`] resolved from that root and the zone
//! name.

pub mod file;
pub mod retry;
pub mod s3;

pub use file::LocalFileSink;
pub use retry::{run_with_retry, RetryPolicy};
pub use s3::{part_size_for, ObjectStoreSink, DEFAULT_PART_SIZE, LARGE_ZONE_PART_SIZE};

use std::fmt;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::downloader::AssembledZone;
use crate::error::{Error, Result};

/// Where one zone file ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    /// A file on the local filesystem.
    File(PathBuf),
    /// An object in a bucket.
    Object { bucket: String, key: String },
}

impl SinkTarget {
    /// Resolve the destination for `zone` under `output_root`.
    ///
    /// Roots starting with `s3://` resolve to objects, anything else to a
    /// path under a local directory. The file name is always
    /// `<zone>.txt.gz`.
    pub fn resolve(output_root: &str, zone: &str) -> Result<SinkTarget> {
        let file = format!("{zone}.txt.gz");
        match output_root.strip_prefix("s3://") {
            Some(rest) => {
                let mut pieces = rest.splitn(2, '/');
                let bucket = pieces.next().unwrap_or_default();
                if bucket.is_empty() {
                    return Err(Error::InvalidUrl(format!(
                        "The output root \"{output_root}\" does not name a bucket"
                    )));
                }
                let prefix = pieces.next().unwrap_or_default().trim_matches('/');
                let key = if prefix.is_empty() {
                    file
                } else {
                    format!("{prefix}/{file}")
                };
                Ok(SinkTarget::Object {
                    bucket: bucket.to_string(),
                    key,
                })
            }
            None => Ok(SinkTarget::File(PathBuf::from(output_root).join(file))),
        }
    }
}

impl fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkTarget::File(path) => write!(f, "{}", path.display()),
            SinkTarget::Object { bucket, key } => write!(f, "s3://{bucket}/{key}"),
        }
    }
}

/// A persistence backend selected from the output root.
#[derive(Debug, Clone)]
pub enum Sink {
    Local(LocalFileSink),
    ObjectStore(ObjectStoreSink),
}

impl Sink {
    /// Select and prepare the backend matching `output_root`.
    ///
    /// Local roots are created here, so an unusable root fails the run
    /// before any job starts.
    pub async fn for_root(output_root: &str, retry: RetryPolicy) -> Result<Sink> {
        if output_root.starts_with("s3://") {
            // Fail on malformed roots before any job runs.
            SinkTarget::resolve(output_root, "probe")?;
            Ok(Sink::ObjectStore(ObjectStoreSink::from_env(retry).await))
        } else {
            tokio::fs::create_dir_all(output_root).await.map_err(|e| {
                Error::Internal(format!(
                    "cannot create output root \"{output_root}\": {e}"
                ))
            })?;
            Ok(Sink::Local(LocalFileSink))
        }
    }

    /// Persist `zone` at `target`, returning the number of bytes written.
    ///
    /// All persistence failures surface as [`Error::PersistFailed`], except
    /// cancellation which passes through.
    pub async fn save(
        &self,
        target: &SinkTarget,
        zone_name: &str,
        zone: AssembledZone,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        match (self, target) {
            (Sink::Local(sink), SinkTarget::File(path)) => {
                sink.save(path, zone).await.map_err(|e| Error::PersistFailed {
                    target: target.to_string(),
                    attempts: 1,
                    reason: e.to_string(),
                })
            }
            (Sink::ObjectStore(sink), SinkTarget::Object { bucket, key }) => {
                sink.save(bucket, key, zone, part_size_for(zone_name), cancel)
                    .await
            }
            _ => Err(Error::Internal(format!(
                "sink cannot persist to \"{target}\""
            ))),
        }
    }
}
