//! Data-parallel KMP search.
//!
//! The text is cut into one contiguous segment per worker. Every segment but
//! the last is stretched right by `M - 1` bytes so that an occurrence
//! crossing a cut still lies entirely inside the segment where it starts.
//! Workers share the text and the LPS table read-only; the only shared
//! mutable state is an `AtomicBool` that is OR-ed into and read after the
//! pool's scope has joined. Workers poll that flag and stop early once any
//! worker has matched.

use rayon::{ThreadPool, ThreadPoolBuilder};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, trace};

use super::lps::LpsTable;
use super::matcher::{scan_until, ScanOutcome};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;

/// Half-open byte range `[start, end)` of the text owned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

fn check_workers(workers: usize) -> SearchResult<()> {
    if workers == 0 {
        return Err(SearchError::InvalidWorkerCount(workers));
    }
    Ok(())
}

/// Segment layout for already validated inputs
fn segments(text_len: usize, pattern_len: usize, workers: usize) -> Vec<Segment> {
    if text_len == 0 || pattern_len > text_len {
        return Vec::new();
    }

    // More workers than bytes would only produce empty segments.
    let active = workers.min(text_len);
    let chunk = text_len / active;
    let overlap = pattern_len.saturating_sub(1);

    (0..active)
        .map(|t| {
            let start = chunk * t;
            let end = if t + 1 == active {
                text_len
            } else {
                (chunk * (t + 1) + overlap).min(text_len)
            };
            Segment { start, end }
        })
        .collect()
}

/// Splits `[0, text_len)` into at most `workers` overlapping segments.
///
/// Returns no segments when the pattern is longer than the text.
pub fn plan_segments(
    text_len: usize,
    pattern_len: usize,
    workers: usize,
) -> SearchResult<Vec<Segment>> {
    check_workers(workers)?;
    if pattern_len == 0 {
        return Err(SearchError::EmptyPattern);
    }
    Ok(segments(text_len, pattern_len, workers))
}

/// Runs KMP over segments of the text on a fixed-size worker pool
#[derive(Debug)]
pub struct ParallelMatcher {
    pool: ThreadPool,
    workers: usize,
    metrics: SearchMetrics,
}

impl ParallelMatcher {
    /// Starts a pool of `workers` threads
    pub fn new(workers: usize) -> SearchResult<Self> {
        Self::with_metrics(workers, SearchMetrics::new())
    }

    pub fn with_metrics(workers: usize, metrics: SearchMetrics) -> SearchResult<Self> {
        check_workers(workers)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("kmp-worker-{}", i))
            .build()?;
        debug!("Started parallel matcher with {} workers", workers);
        Ok(Self {
            pool,
            workers,
            metrics,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Returns true iff `pattern` occurs in `text`.
    ///
    /// Always agrees with the sequential scan, whatever the worker count.
    ///
    /// # Panics
    ///
    /// Panics if `lps` was not built from `pattern` (length mismatch).
    pub fn search(&self, pattern: &[u8], lps: &LpsTable, text: &[u8]) -> bool {
        assert_eq!(pattern.len(), lps.len(), "LPS table built for another pattern");
        let segments = segments(text.len(), pattern.len(), self.workers);
        if segments.is_empty() {
            trace!(
                "Pattern of {} bytes longer than text of {} bytes",
                pattern.len(),
                text.len()
            );
            return false;
        }

        let found = AtomicBool::new(false);
        let cut_short = AtomicU64::new(0);

        self.pool.scope(|scope| {
            for (worker, segment) in segments.iter().copied().enumerate() {
                let (found, cut_short) = (&found, &cut_short);
                scope.spawn(move |_| {
                    match scan_until(pattern, lps, &text[segment.range()], found) {
                        ScanOutcome::Found => {
                            found.store(true, Ordering::Release);
                            trace!("Worker {} matched in {:?}", worker, segment);
                        }
                        ScanOutcome::NotFound => {
                            trace!("Worker {} found nothing in {:?}", worker, segment);
                        }
                        ScanOutcome::Abandoned => {
                            cut_short.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        self.metrics.record_parallel_search(segments.len() as u64);
        self.metrics
            .record_segments_cut_short(cut_short.load(Ordering::Relaxed));

        found.load(Ordering::Acquire)
    }
}

/// One-shot parallel search on a pool that lives for the duration of the call
pub fn parallel_search(
    pattern: &[u8],
    lps: &LpsTable,
    text: &[u8],
    workers: usize,
) -> SearchResult<bool> {
    check_workers(workers)?;
    if pattern.len() > text.len() {
        return Ok(false);
    }
    // At most one thread per text byte; extra workers would own nothing.
    let matcher = ParallelMatcher::new(workers.min(text.len()))?;
    Ok(matcher.search(pattern, lps, text))
}
