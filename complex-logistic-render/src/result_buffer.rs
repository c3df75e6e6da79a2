use crate::chunk::ChunkSpan;

/// Per-sample escape flags for a full frame.
///
/// Same column-major layout as [`SampleGrid`](complex_logistic_core::SampleGrid):
/// column `i`, row `j` lives at `i * height + j`. Every flag starts `false`
/// and is written exactly once by the chunk that owns its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<bool>,
}

impl ResultBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn index(&self, i: u32, j: u32) -> usize {
        i as usize * self.height as usize + j as usize
    }

    /// Escape flag of column `i`, row `j`.
    #[inline]
    pub fn escaped(&self, i: u32, j: u32) -> bool {
        self.data[self.index(i, j)]
    }

    pub fn escaped_count(&self) -> usize {
        self.data.iter().filter(|&&e| e).count()
    }

    /// Hand out one mutable slice per span.
    ///
    /// `spans` must be sorted, non-overlapping, and within bounds, which is
    /// what [`build_chunk_spans`](crate::chunk::build_chunk_spans) returns.
    /// The returned slices borrow disjoint parts of the buffer, so workers
    /// can fill them in parallel without locking.
    pub fn split_spans_mut<'a>(
        &'a mut self,
        spans: &[ChunkSpan],
    ) -> Vec<(ChunkSpan, &'a mut [bool])> {
        let mut handles = Vec::with_capacity(spans.len());
        let mut rest: &'a mut [bool] = &mut self.data;
        let mut offset = 0;
        for &span in spans {
            assert!(span.start >= offset, "chunk spans must be sorted and disjoint");
            let (_, tail) = std::mem::take(&mut rest).split_at_mut(span.start - offset);
            let (head, tail) = tail.split_at_mut(span.len);
            handles.push((span, head));
            rest = tail;
            offset = span.end();
        }
        handles
    }
}
