use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks corpus loading, LPS caching and search activity
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    // Corpus metrics
    corpus_bytes: Arc<AtomicU64>,
    mmap_bytes: Arc<AtomicU64>,
    owned_corpora: Arc<AtomicU64>,
    mapped_corpora: Arc<AtomicU64>,

    // LPS cache metrics
    cache_size: Arc<AtomicU64>,
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,

    // Search metrics
    sequential_searches: Arc<AtomicU64>,
    parallel_searches: Arc<AtomicU64>,
    segments_scanned: Arc<AtomicU64>,
    segments_cut_short: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            corpus_bytes: Arc::new(AtomicU64::new(0)),
            mmap_bytes: Arc::new(AtomicU64::new(0)),
            owned_corpora: Arc::new(AtomicU64::new(0)),
            mapped_corpora: Arc::new(AtomicU64::new(0)),
            cache_size: Arc::new(AtomicU64::new(0)),
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
            sequential_searches: Arc::new(AtomicU64::new(0)),
            parallel_searches: Arc::new(AtomicU64::new(0)),
            segments_scanned: Arc::new(AtomicU64::new(0)),
            segments_cut_short: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a corpus brought into memory, either read or mapped
    pub fn record_corpus_load(&self, bytes: u64, mapped: bool) {
        let total = self.corpus_bytes.fetch_add(bytes, Ordering::Relaxed) + bytes;
        if mapped {
            self.mmap_bytes.fetch_add(bytes, Ordering::Relaxed);
            self.mapped_corpora.fetch_add(1, Ordering::Relaxed);
        } else {
            self.owned_corpora.fetch_add(1, Ordering::Relaxed);
        }
        debug!("Corpus loaded: {} bytes, total: {} bytes", bytes, total);
    }

    /// Records an LPS cache lookup; `size_delta` is the bytes added on a miss
    pub fn record_cache_operation(&self, size_delta: u64, hit: bool) {
        self.cache_size.fetch_add(size_delta, Ordering::Relaxed);
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_sequential_search(&self) {
        self.sequential_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one parallel search over `segments` segments
    pub fn record_parallel_search(&self, segments: u64) {
        self.parallel_searches.fetch_add(1, Ordering::Relaxed);
        self.segments_scanned.fetch_add(segments, Ordering::Relaxed);
    }

    /// Records segments abandoned because another worker already matched
    pub fn record_segments_cut_short(&self, segments: u64) {
        self.segments_cut_short.fetch_add(segments, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Gets a snapshot of the current counters
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            corpus_bytes: self.corpus_bytes.load(Ordering::Relaxed),
            mmap_bytes: self.mmap_bytes.load(Ordering::Relaxed),
            owned_corpora: self.owned_corpora.load(Ordering::Relaxed),
            mapped_corpora: self.mapped_corpora.load(Ordering::Relaxed),
            cache_size: self.cache_size.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            sequential_searches: self.sequential_searches.load(Ordering::Relaxed),
            parallel_searches: self.parallel_searches.load(Ordering::Relaxed),
            segments_scanned: self.segments_scanned.load(Ordering::Relaxed),
            segments_cut_short: self.segments_cut_short.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Corpus bytes (total/mapped): {}/{}\n\
             Corpora loaded (read/mapped): {}/{}\n\
             LPS cache size: {} bytes\n\
             LPS cache hits/misses: {}/{}\n\
             Searches (sequential/parallel): {}/{}\n\
             Segments scanned/cut short: {}/{}",
            stats.corpus_bytes,
            stats.mmap_bytes,
            stats.owned_corpora,
            stats.mapped_corpora,
            stats.cache_size,
            stats.cache_hits,
            stats.cache_misses,
            stats.sequential_searches,
            stats.parallel_searches,
            stats.segments_scanned,
            stats.segments_cut_short
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub corpus_bytes: u64,
    pub mmap_bytes: u64,
    pub owned_corpora: u64,
    pub mapped_corpora: u64,
    pub cache_size: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub sequential_searches: u64,
    pub parallel_searches: u64,
    pub segments_scanned: u64,
    pub segments_cut_short: u64,
}
