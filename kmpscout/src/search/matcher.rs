use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

use super::lps::LpsTable;
use super::parallel::{parallel_search, ParallelMatcher};
use super::SearchMode;
use crate::errors::SearchResult;
use crate::metrics::SearchMetrics;

/// Text bytes consumed between two polls of the shared stop flag
pub(crate) const STOP_POLL_STRIDE: usize = 16 * 1024;

/// How a bounded scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanOutcome {
    Found,
    NotFound,
    /// Another worker matched first; this segment was not finished
    Abandoned,
}

/// Core KMP loop. `should_stop` is polled every `STOP_POLL_STRIDE` bytes.
fn kmp_scan(
    pattern: &[u8],
    lps: &LpsTable,
    text: &[u8],
    mut should_stop: impl FnMut() -> bool,
) -> ScanOutcome {
    assert_eq!(pattern.len(), lps.len(), "LPS table built for another pattern");

    let (n, m) = (text.len(), pattern.len());
    let mut i = 0;
    let mut j = 0;
    let mut next_poll = STOP_POLL_STRIDE;

    while i < n && j < m {
        if i >= next_poll {
            if should_stop() {
                return ScanOutcome::Abandoned;
            }
            next_poll = i + STOP_POLL_STRIDE;
        }

        if text[i] == pattern[j] {
            i += 1;
            j += 1;
        } else if j != 0 {
            // Matched prefix bytes are never re-read.
            j = lps.fallback(j);
        } else {
            i += 1;
        }
    }

    if j == m {
        ScanOutcome::Found
    } else {
        ScanOutcome::NotFound
    }
}

/// Returns true iff `pattern` occurs in `text`. O(N) time, no allocation.
///
/// # Panics
///
/// Panics if `lps` was not built from `pattern` (length mismatch).
pub fn scan(pattern: &[u8], lps: &LpsTable, text: &[u8]) -> bool {
    kmp_scan(pattern, lps, text, || false) == ScanOutcome::Found
}

/// Like [`scan`], but gives up once `stop` is raised by another worker
pub(crate) fn scan_until(
    pattern: &[u8],
    lps: &LpsTable,
    text: &[u8],
    stop: &AtomicBool,
) -> ScanOutcome {
    kmp_scan(pattern, lps, text, || stop.load(Ordering::Acquire))
}

/// A pattern together with its failure function, built once per query
#[derive(Debug, Clone)]
pub struct KmpPattern {
    bytes: Vec<u8>,
    lps: Arc<LpsTable>,
}

impl KmpPattern {
    /// Compiles a pattern, failing with `EmptyPattern` for empty input
    pub fn new(pattern: impl Into<Vec<u8>>) -> SearchResult<Self> {
        let bytes = pattern.into();
        let lps = Arc::new(LpsTable::build(&bytes)?);
        Ok(Self { bytes, lps })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn lps(&self) -> &LpsTable {
        &self.lps
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Sequential search over the whole text
    pub fn is_match(&self, text: &[u8]) -> bool {
        scan(&self.bytes, &self.lps, text)
    }

    /// Searches `text` with the given strategy
    pub fn find_in(&self, text: &[u8], mode: SearchMode) -> SearchResult<bool> {
        match mode {
            SearchMode::Sequential => Ok(self.is_match(text)),
            SearchMode::Parallel(workers) => {
                parallel_search(&self.bytes, &self.lps, text, workers)
            }
        }
    }

    /// Searches `text` on an existing worker pool
    pub fn find_with(&self, text: &[u8], matcher: &ParallelMatcher) -> bool {
        matcher.search(&self.bytes, &self.lps, text)
    }
}

/// Concurrent cache of failure functions keyed by pattern bytes
#[derive(Debug, Default)]
pub struct LpsCache {
    entries: DashMap<Vec<u8>, Arc<LpsTable>>,
    metrics: SearchMetrics,
}

impl LpsCache {
    pub fn new() -> Self {
        Self::with_metrics(SearchMetrics::new())
    }

    /// Creates a cache that reports hits and misses into `metrics`
    pub fn with_metrics(metrics: SearchMetrics) -> Self {
        Self {
            entries: DashMap::new(),
            metrics,
        }
    }

    /// Returns the cached table for `pattern`, building it on first use
    pub fn get_or_build(&self, pattern: &[u8]) -> SearchResult<Arc<LpsTable>> {
        if let Some(entry) = self.entries.get(pattern) {
            self.metrics.record_cache_operation(0, true);
            return Ok(Arc::clone(entry.value()));
        }

        let lps = Arc::new(LpsTable::build(pattern)?);
        self.metrics
            .record_cache_operation((pattern.len() + lps.heap_size()) as u64, false);
        trace!("Cached LPS table for {} byte pattern", pattern.len());
        self.entries.insert(pattern.to_vec(), Arc::clone(&lps));
        Ok(lps)
    }

    /// Compiles `pattern`, reusing a cached failure function when present
    pub fn compile(&self, pattern: &[u8]) -> SearchResult<KmpPattern> {
        let lps = self.get_or_build(pattern)?;
        Ok(KmpPattern {
            bytes: pattern.to_vec(),
            lps,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchError;

    fn found(pattern: &[u8], text: &[u8]) -> bool {
        let lps = LpsTable::build(pattern).unwrap();
        scan(pattern, &lps, text)
    }

    #[test]
    fn test_reference_example() {
        assert!(found(b"ABABCABAB", b"ABABDABACDABABCABAB"));
    }

    #[test]
    fn test_absent_pattern() {
        assert!(!found(b"ABABCABAC", b"ABABDABACDABABCABAB"));
        assert!(!found(b"z", b"hello world"));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(!found(b"a", b""));
        assert!(!found(b"AAAAA", b"AAAA"));
        assert!(found(b"AAAA", b"AAAA"));
    }

    #[test]
    fn test_match_at_edges() {
        assert!(found(b"hello", b"hello world"));
        assert!(found(b"world", b"hello world"));
        assert!(found(b"o w", b"hello world"));
    }

    #[test]
    fn test_fallback_after_partial_match() {
        // The scan must fall back inside "AAB" instead of restarting after it.
        assert!(found(b"AAB", b"AAAAAB"));
        assert!(found(b"ABAC", b"ABABAC"));
    }

    #[test]
    fn test_scan_until_stops_when_flag_raised() {
        let text = vec![b'a'; STOP_POLL_STRIDE * 4];
        let lps = LpsTable::build(b"b").unwrap();

        let stop = AtomicBool::new(true);
        assert_eq!(scan_until(b"b", &lps, &text, &stop), ScanOutcome::Abandoned);

        let stop = AtomicBool::new(false);
        assert_eq!(scan_until(b"b", &lps, &text, &stop), ScanOutcome::NotFound);
    }

    #[test]
    fn test_scan_until_finds_before_first_poll() {
        let lps = LpsTable::build(b"needle").unwrap();
        let stop = AtomicBool::new(true);
        assert_eq!(
            scan_until(b"needle", &lps, b"haystack needle", &stop),
            ScanOutcome::Found
        );
    }

    #[test]
    fn test_kmp_pattern_modes_agree() {
        let pattern = KmpPattern::new("ABABCABAB").unwrap();
        let text = b"ABABDABACDABABCABAB";
        assert_eq!(pattern.len(), 9);
        assert!(pattern.is_match(text));
        assert!(pattern.find_in(text, SearchMode::Sequential).unwrap());
        assert!(pattern.find_in(text, SearchMode::Parallel(4)).unwrap());
    }

    #[test]
    fn test_find_in_with_huge_worker_count() {
        let pattern = KmpPattern::new("c").unwrap();
        assert!(pattern.find_in(b"abc", SearchMode::Parallel(1_000_000)).unwrap());
        assert!(matches!(
            pattern.find_in(b"abc", SearchMode::Parallel(0)),
            Err(SearchError::InvalidWorkerCount(0))
        ));
    }

    #[test]
    #[should_panic(expected = "LPS table built for another pattern")]
    fn test_scan_rejects_mismatched_table() {
        let lps = LpsTable::build(b"ab").unwrap();
        scan(b"abab", &lps, b"xxababxx");
    }

    #[test]
    fn test_kmp_pattern_rejects_empty() {
        assert!(matches!(KmpPattern::new(""), Err(SearchError::EmptyPattern)));
    }

    #[test]
    fn test_lps_cache_hits_and_misses() {
        let cache = LpsCache::new();

        let first = cache.get_or_build(b"abcab").unwrap();
        let second = cache.get_or_build(b"abcab").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.metrics().cache_misses(), 1);
        assert_eq!(cache.metrics().cache_hits(), 1);

        cache.get_or_build(b"xyz").unwrap();
        assert_eq!(cache.metrics().cache_misses(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lps_cache_rejects_empty_without_caching() {
        let cache = LpsCache::new();
        assert!(matches!(cache.compile(b""), Err(SearchError::EmptyPattern)));
        assert!(cache.is_empty());
        assert_eq!(cache.metrics().cache_misses(), 0);
    }

    #[test]
    fn test_compiled_pattern_from_cache() {
        let cache = LpsCache::new();
        let pattern = cache.compile(b"tomorrow").unwrap();
        assert_eq!(pattern.as_bytes(), b"tomorrow");
        assert!(pattern.is_match(b"tomorrow, and tomorrow, and tomorrow"));
        assert!(!pattern.is_match(b"yesterday"));
    }
}
