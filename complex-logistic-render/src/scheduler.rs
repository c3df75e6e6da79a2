use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use complex_logistic_core::{Complex, EscapeKernel, SampleGrid};

use crate::chunk::{build_chunk_spans, ChunkSpan, CHUNK_SIZE};
use crate::error::RenderError;
use crate::result_buffer::ResultBuffer;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Tracks the current render generation for cancellation and progress.
///
/// Callers record [`generation`](Self::generation) when they issue a
/// request and hand it to `compute_all`. Advancing the generation tells
/// every chunk of an older request to skip its work, and makes the older
/// `compute_all` call return [`RenderError::Cancelled`] instead of a
/// partial buffer, whether or not it had started.
#[derive(Debug)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            progress_done: AtomicUsize::new(0),
            progress_total: AtomicUsize::new(0),
        }
    }

    /// Cancel the current render by advancing the generation.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Read the current generation.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reset progress for a new batch of `total` chunks.
    pub fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    /// Increment completed chunks by one.
    pub fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current progress as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for RenderCancel {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Sample points per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Worker threads in the pool; `0` uses the hardware parallelism.
    #[serde(default)]
    pub worker_threads: usize,
}

fn default_chunk_size() -> usize {
    CHUNK_SIZE
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            worker_threads: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// The outcome of one fully joined `compute_all` call.
#[derive(Debug, Clone)]
pub struct ComputeOutcome {
    pub buffer: ResultBuffer,
    pub elapsed: Duration,
    pub chunks: usize,
}

/// What happened to a single chunk.
enum ChunkStatus {
    Done,
    Skipped,
    Failed(String),
}

/// Runs the batch kernel over chunks of a sample grid on a bounded pool.
pub struct ChunkScheduler {
    pool: rayon::ThreadPool,
    chunk_size: usize,
}

impl ChunkScheduler {
    pub fn new(config: SchedulerConfig) -> crate::Result<Self> {
        if config.chunk_size == 0 {
            return Err(RenderError::InvalidChunkSize(config.chunk_size));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("chunk-worker-{i}"))
            .build()?;
        debug!(
            chunk_size = config.chunk_size,
            workers = pool.current_num_threads(),
            "Chunk scheduler ready"
        );
        Ok(Self {
            pool,
            chunk_size: config.chunk_size,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Classify every point of `grid`, one kernel batch per chunk.
    ///
    /// `generation` is the value of `cancel` the caller's request was issued
    /// under. If `cancel` has already moved past it, the call returns
    /// [`RenderError::Cancelled`] without running any chunk; if it moves
    /// during the call, remaining chunks are skipped and the result is the
    /// same error.
    ///
    /// Otherwise returns only after every chunk has finished. Output is
    /// independent of the chunk size and worker count. Any failed chunk turns
    /// the whole call into a single [`RenderError::WorkerFailure`].
    pub fn compute_all<K: EscapeKernel + Sync>(
        &self,
        kernel: &K,
        grid: &SampleGrid,
        cancel: &RenderCancel,
        generation: u64,
    ) -> crate::Result<ComputeOutcome> {
        let start = Instant::now();
        let gen = generation;
        if cancel.generation() != gen {
            debug!(generation = gen, "Chunked compute already superseded");
            return Err(RenderError::Cancelled);
        }
        let spans = build_chunk_spans(grid.len(), self.chunk_size);
        let total = spans.len();
        cancel.reset_progress(total);
        debug!(
            points = grid.len(),
            chunks = total,
            generation = gen,
            "Starting chunked compute"
        );

        let mut buffer = ResultBuffer::new(grid.width(), grid.height());
        let points = grid.points();
        let statuses: Vec<ChunkStatus> = {
            let handles = buffer.split_spans_mut(&spans);
            self.pool.install(|| {
                handles
                    .into_par_iter()
                    .map(|(span, out)| {
                        run_chunk(kernel, span, &points[span.range()], out, cancel, gen)
                    })
                    .collect()
            })
        };

        if cancel.generation() != gen {
            debug!(generation = gen, "Chunked compute superseded");
            return Err(RenderError::Cancelled);
        }

        let mut failures = statuses.into_iter().filter_map(|status| match status {
            ChunkStatus::Failed(reason) => Some(reason),
            ChunkStatus::Done | ChunkStatus::Skipped => None,
        });
        if let Some(first) = failures.next() {
            let failed = 1 + failures.count();
            return Err(RenderError::WorkerFailure {
                failed,
                total,
                first,
            });
        }

        let elapsed = start.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis(),
            chunks = total,
            escaped = buffer.escaped_count(),
            "Chunked compute complete"
        );
        Ok(ComputeOutcome {
            buffer,
            elapsed,
            chunks: total,
        })
    }
}

/// Run one chunk to completion, converting kernel errors and panics into a
/// status so a bad chunk never takes the join down with it.
fn run_chunk<K: EscapeKernel>(
    kernel: &K,
    span: ChunkSpan,
    points: &[Complex],
    out: &mut [bool],
    cancel: &RenderCancel,
    gen: u64,
) -> ChunkStatus {
    if cancel.generation() != gen {
        return ChunkStatus::Skipped;
    }
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| kernel.escapes_batch_into(points, out)));
    cancel.inc_progress();
    match outcome {
        Ok(Ok(())) => ChunkStatus::Done,
        Ok(Err(e)) => ChunkStatus::Failed(format!(
            "chunk {}..{}: {e}",
            span.start,
            span.end()
        )),
        Err(payload) => ChunkStatus::Failed(format!(
            "chunk {}..{} panicked: {}",
            span.start,
            span.end(),
            panic_message(payload.as_ref())
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
