//! Range fetching of a single planned chunk.

use bytes::{BufMut, BytesMut};
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::header::RANGE;
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

use crate::chunk::{ChunkResult, ChunkSpec};
use crate::error::{Error, Result};

/// Fetch one chunk of `url` with a ranged GET.
///
/// The response body is streamed into an owned buffer and the chunk's
/// progress bar advances as pieces arrive. Any transport error, non-success
/// status, or a body whose size disagrees with the plan fails the chunk;
/// nothing here retries.
pub async fn fetch_chunk(
    client: ClientWithMiddleware,
    url: Url,
    spec: ChunkSpec,
    progress: ProgressBar,
) -> Result<ChunkResult> {
    let range = spec.range_header();
    debug!("Fetching {spec} of {url} as {range}");

    let response = client
        .get(url)
        .header(RANGE, range.as_str())
        .send()
        .await
        .map_err(|e| fetch_error(&spec, &range, e))?;
    response
        .error_for_status_ref()
        .map_err(|e| fetch_error(&spec, &range, e))?;

    let mut body = BytesMut::with_capacity(spec.length as usize);
    let mut stream = response.bytes_stream();
    while let Some(item) = stream.next().await {
        let piece = item.map_err(|e| fetch_error(&spec, &range, e))?;
        progress.inc(piece.len() as u64);
        body.put(piece);
    }

    if body.len() as u64 != spec.length {
        return Err(fetch_error(
            &spec,
            &range,
            format!("expected {} bytes, server sent {}", spec.length, body.len()),
        ));
    }

    Ok(ChunkResult {
        index: spec.index,
        bytes: body.freeze(),
    })
}

fn fetch_error(spec: &ChunkSpec, range: &str, reason: impl std::fmt::Display) -> Error {
    Error::FetchFailure {
        index: spec.index,
        range: range.to_string(),
        reason: reason.to_string(),
    }
}
