//! Object store persistence backed by Amazon S3.

use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::retry::{run_with_retry, RetryPolicy};
use crate::downloader::AssembledZone;
use crate::error::{Error, Result};

pub(crate) const MEBI_BYTE: u64 = 1024 * 1024;

/// Multipart part size for most zones.
pub const DEFAULT_PART_SIZE: u64 = 5 * MEBI_BYTE;

/// Multipart part size for the handful of very large zones.
pub const LARGE_ZONE_PART_SIZE: u64 = 10 * MEBI_BYTE;

/// Zones big enough to warrant the larger part size.
const LARGE_ZONES: [&str; 4] = ["com", "net", "org", "top"];

/// Pick the multipart part size for a zone.
pub fn part_size_for(zone: &str) -> u64 {
    if LARGE_ZONES.contains(&zone) {
        LARGE_ZONE_PART_SIZE
    } else {
        DEFAULT_PART_SIZE
    }
}

/// Persists assembled zones as objects in an S3 bucket.
///
/// Payloads no bigger than one part go up with a plain `PutObject`; larger
/// ones use a multipart upload that is aborted on failure so no orphaned
/// parts accrue charges.
#[derive(Debug, Clone)]
pub struct ObjectStoreSink {
    client: Client,
    retry: RetryPolicy,
}

impl ObjectStoreSink {
    pub fn new(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Build a sink from the ambient AWS environment.
    ///
    /// When `AWS_ENDPOINT_URL` points somewhere custom, the client switches
    /// to path-style addressing so bucket names need not resolve as DNS
    /// labels.
    pub async fn from_env(retry: RetryPolicy) -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_s3::config::Builder::from(&config);
        if std::env::var("AWS_ENDPOINT_URL").is_ok() {
            builder = builder.force_path_style(true);
        }
        Self::new(Client::from_conf(builder.build()), retry)
    }

    /// Persist `zone` as `key` in `bucket`, retrying per the sink's policy.
    ///
    /// Returns the number of bytes uploaded. Once the retry budget is spent
    /// the last error surfaces as [`Error::PersistFailed`]; cancellation
    /// passes through untouched.
    pub async fn save(
        &self,
        bucket: &str,
        key: &str,
        zone: AssembledZone,
        part_size: u64,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let body = zone.into_bytes();
        let total = body.len() as u64;

        let outcome = run_with_retry(self.retry, cancel, || {
            self.put(bucket, key, body.clone(), part_size)
        })
        .await;

        match outcome {
            Ok(()) => Ok(total),
            Err(e) if e.is_cancelled() => Err(e),
            Err(e) => Err(Error::PersistFailed {
                target: format!("s3://{bucket}/{key}"),
                attempts: self.retry.max_attempts(),
                reason: e.to_string(),
            }),
        }
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes, part_size: u64) -> Result<()> {
        if body.len() as u64 <= part_size {
            self.put_single(bucket, key, body).await
        } else {
            self.put_multipart(bucket, key, body, part_size).await
        }
    }

    async fn put_single(&self, bucket: &str, key: &str, body: Bytes) -> Result<()> {
        debug!("Uploading s3://{bucket}/{key} in one part");
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Error::Internal(format!("put_object failed: {e}")))?;
        Ok(())
    }

    async fn put_multipart(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        part_size: u64,
    ) -> Result<()> {
        let upload = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("create_multipart_upload failed: {e}")))?;
        let upload_id = upload
            .upload_id()
            .ok_or_else(|| Error::Internal("multipart upload came back without an id".to_string()))?
            .to_string();

        match self
            .upload_parts(bucket, key, &upload_id, body, part_size)
            .await
        {
            Ok(parts) => {
                self.client
                    .complete_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .multipart_upload(
                        CompletedMultipartUpload::builder()
                            .set_parts(Some(parts))
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|e| {
                        Error::Internal(format!("complete_multipart_upload failed: {e}"))
                    })?;
                Ok(())
            }
            Err(e) => {
                let abort = self
                    .client
                    .abort_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await;
                if let Err(abort_err) = abort {
                    warn!("Abandoning upload {upload_id} of s3://{bucket}/{key} failed: {abort_err}");
                }
                Err(e)
            }
        }
    }

    async fn upload_parts(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        body: Bytes,
        part_size: u64,
    ) -> Result<Vec<CompletedPart>> {
        let part_size = part_size as usize;
        let mut parts = Vec::with_capacity(body.len().div_ceil(part_size));
        let mut offset = 0;
        let mut part_number = 1i32;
        while offset < body.len() {
            let end = (offset + part_size).min(body.len());
            let slice = body.slice(offset..end);
            debug!(
                "Uploading part {part_number} of s3://{bucket}/{key} ({} bytes)",
                slice.len()
            );
            let out = self
                .client
                .upload_part()
                .bucket(bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(slice))
                .send()
                .await
                .map_err(|e| Error::Internal(format!("upload_part {part_number} failed: {e}")))?;
            parts.push(
                CompletedPart::builder()
                    .part_number(part_number)
                    .set_e_tag(out.e_tag().map(str::to_string))
                    .build(),
            );
            offset = end;
            part_number += 1;
        }
        Ok(parts)
    }
}
