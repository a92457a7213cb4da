//! Byte-range planning for chunked transfers.
//!
//! A resource of known size is divided into an ordered run of
//! non-overlapping ranges covering `[0, size)` exactly once. Every range
//! except the last holds `ceil(size / count)` bytes; the last takes exactly
//! the remainder, so rounding never spills past the end of the resource.

pub mod fetch;

use bytes::Bytes;
use std::fmt;

/// One planned byte range of a remote resource.
///
/// Ranges are half-open `[offset, offset + length)`. The tail chunk absorbs
/// all rounding and is expressed open-ended on the wire so the server
/// decides where the resource ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSpec {
    /// Position of this chunk among its siblings, starting at zero.
    pub index: usize,
    /// First byte of the range.
    pub offset: u64,
    /// Number of bytes in the range.
    pub length: u64,
    /// Whether this is the final chunk of the resource.
    pub tail: bool,
}

impl ChunkSpec {
    /// First byte past the end of this range.
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    /// Render the `Range` request header value for this chunk.
    pub fn range_header(&self) -> String {
        if self.tail {
            format!("bytes={}-", self.offset)
        } else {
            format!("bytes={}-{}", self.offset, self.end() - 1)
        }
    }
}

impl fmt::Display for ChunkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk {} [{}, {})", self.index, self.offset, self.end())
    }
}

/// The fetched payload of one [`ChunkSpec`].
///
/// Ownership of the buffer transfers to the assembler on receipt.
#[derive(Debug)]
pub struct ChunkResult {
    /// Index of the originating [`ChunkSpec`].
    pub index: usize,
    /// The range's bytes.
    pub bytes: Bytes,
}

/// Plan the byte ranges for one resource.
///
/// Divides `total_size` into at most `chunk_count` ranges of
/// `ceil(total_size / count)` bytes, the final range taking exactly the
/// remainder. The effective count is clamped to the resource size so every
/// range holds at least one byte, and planning stops as soon as the
/// accumulated offset reaches the end, which can yield fewer ranges than
/// requested.
///
/// A zero `total_size` yields an empty plan; a zero `chunk_count` is
/// treated as one.
///
/// # Example
///
/// ```rust
/// use zonepull::chunk::plan_chunks;
///
/// let specs = plan_chunks(300, 3);
/// assert_eq!(specs.len(), 3);
/// assert_eq!((specs[0].offset, specs[0].length), (0, 100));
/// assert_eq!((specs[2].offset, specs[2].length), (200, 100));
/// assert!(specs[2].tail);
/// ```
pub fn plan_chunks(total_size: u64, chunk_count: usize) -> Vec<ChunkSpec> {
    if total_size == 0 {
        return Vec::new();
    }
    let requested = chunk_count.max(1) as u64;
    let count = requested.min(total_size);
    let chunk_size = total_size.div_ceil(count);

    let mut specs = Vec::with_capacity(count as usize);
    let mut offset = 0;
    let mut index = 0;
    while offset < total_size {
        let remaining = total_size - offset;
        let tail = remaining <= chunk_size;
        let length = if tail { remaining } else { chunk_size };
        specs.push(ChunkSpec {
            index,
            offset,
            length,
            tail,
        });
        offset += length;
        index += 1;
    }
    specs
}
