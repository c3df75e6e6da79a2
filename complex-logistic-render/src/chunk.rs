/// Default number of sample points per chunk.
pub const CHUNK_SIZE: usize = 200;

/// A contiguous index range of the sample grid and result buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    /// Index of the first element.
    pub start: usize,
    /// Number of elements (may be smaller than the chunk size for the last span).
    pub len: usize,
}

impl ChunkSpan {
    /// One past the last index.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end()
    }
}

/// Split `[0, total)` into consecutive spans of at most `chunk_size`.
///
/// `chunk_size` must be non-zero; the scheduler validates it up front.
pub fn build_chunk_spans(total: usize, chunk_size: usize) -> Vec<ChunkSpan> {
    debug_assert!(chunk_size > 0);
    let mut spans = Vec::with_capacity(total.div_ceil(chunk_size.max(1)));
    let mut start = 0;
    while start < total {
        let len = chunk_size.min(total - start);
        spans.push(ChunkSpan { start, len });
        start += len;
    }
    spans
}
