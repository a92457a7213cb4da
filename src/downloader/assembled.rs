//! In-memory result of a chunked download.

use bytes::{BufMut, Bytes, BytesMut};

/// A fully reassembled zone file.
///
/// Holds the fetched chunks in plan order without copying them back
/// together. Sinks may stream the chunks as-is or flatten them with
/// [`AssembledZone::into_bytes`] when a contiguous buffer is required.
#[derive(Debug, Clone, Default)]
pub struct AssembledZone {
    chunks: Vec<Bytes>,
    len: u64,
}

impl AssembledZone {
    /// Build from chunks already sorted by plan index.
    pub fn from_ordered_chunks(chunks: Vec<Bytes>) -> Self {
        let len = chunks.iter().map(|c| c.len() as u64).sum();
        Self { chunks, len }
    }

    /// An empty zone, as produced for a zero-length resource.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of bytes across all chunks.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The chunks in plan order.
    pub fn chunks(&self) -> &[Bytes] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<Bytes> {
        self.chunks
    }

    /// Flatten into one contiguous buffer.
    ///
    /// A single-chunk zone is returned without copying.
    pub fn into_bytes(self) -> Bytes {
        if self.chunks.len() == 1 {
            return self.chunks.into_iter().next().unwrap_or_default();
        }
        let mut buf = BytesMut::with_capacity(self.len as usize);
        for chunk in self.chunks {
            buf.put(chunk);
        }
        buf.freeze()
    }
}
