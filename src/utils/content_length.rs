//! Content length extraction utilities.
//!
//! This module provides utilities for extracting the total size of a remote
//! resource from HTTP responses, supporting both Content-Length and
//! Content-Range headers.

use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE};
use reqwest::Response;

/// Extract the resource size from a Content-Length header.
///
/// Returns `None` when the header is missing or does not parse as an
/// unsigned integer. Used by the metadata probe, where an absent size must
/// be distinguishable from a zero size.
pub fn get_content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Extract the total resource size from a Content-Range header.
///
/// Used by the ranged probe, where the response describes a one-byte slice
/// but carries the full size after the slash.
pub fn get_content_range_total(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_range_total)
}

/// Parse a Content-Range header value to extract the total size.
///
/// Content-Range header format: "bytes start-end/total".
///
/// # Example
///
/// ```rust
/// use zonepull::utils::parse_content_range_total;
///
/// let total = parse_content_range_total("bytes 0-1023/2048");
/// assert_eq!(total, Some(2048));
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    content_range
        .split('/')
        .next_back()
        .and_then(|size| size.trim().parse::<u64>().ok())
}
