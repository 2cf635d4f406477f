use std::time::Instant;
use tracing::{debug, info};

use super::matcher::LpsCache;
use super::parallel::ParallelMatcher;
use super::SearchMode;
use crate::config::SearchConfig;
use crate::corpus::Corpus;
use crate::errors::SearchResult;
use crate::metrics::SearchMetrics;
use crate::query::QuerySet;
use crate::results::{QueryOutcome, SearchReport};

/// Answers a batch of queries against one corpus.
///
/// Holds the worker pool (parallel mode) and the LPS cache so that both are
/// set up once per run instead of once per query.
#[derive(Debug)]
pub struct SearchEngine {
    mode: SearchMode,
    parallel: Option<ParallelMatcher>,
    cache: LpsCache,
    metrics: SearchMetrics,
}

impl SearchEngine {
    /// Validates `mode` and starts the worker pool if it needs one
    pub fn new(mode: SearchMode) -> SearchResult<Self> {
        let mode = mode.validate()?;
        let metrics = SearchMetrics::new();
        let parallel = match mode {
            SearchMode::Sequential => None,
            SearchMode::Parallel(workers) => {
                Some(ParallelMatcher::with_metrics(workers, metrics.clone())?)
            }
        };

        Ok(Self {
            mode,
            parallel,
            cache: LpsCache::with_metrics(metrics.clone()),
            metrics,
        })
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Answers whether a single `pattern` occurs in `corpus`
    pub fn contains(&self, corpus: &[u8], pattern: &[u8]) -> SearchResult<bool> {
        let pattern = self.cache.compile(pattern)?;
        let found = match &self.parallel {
            Some(matcher) => pattern.find_with(corpus, matcher),
            None => {
                self.metrics.record_sequential_search();
                pattern.is_match(corpus)
            }
        };
        Ok(found)
    }

    /// Searches every query in order; the report carries no load time
    pub fn search_corpus(&self, corpus: &[u8], queries: &QuerySet) -> SearchResult<SearchReport> {
        info!(
            "Searching {} queries in {} bytes ({})",
            queries.len(),
            corpus.len(),
            self.mode
        );

        let mut report = SearchReport::new();
        report.corpus_bytes = corpus.len();

        let start = Instant::now();
        for pattern in queries.iter() {
            let found = self.contains(corpus, pattern)?;
            debug!(
                "'{}' {}",
                String::from_utf8_lossy(pattern),
                if found { "found" } else { "not found" }
            );
            report.add_outcome(QueryOutcome::new(pattern, found));
        }
        report.search_time = start.elapsed();
        report.total_time = report.search_time;

        Ok(report)
    }
}

/// Loads the configured corpus and queries, then searches
pub fn run(config: &SearchConfig) -> SearchResult<SearchReport> {
    config.validate()?;
    let engine = SearchEngine::new(config.search_mode())?;

    let start = Instant::now();
    let corpus = Corpus::load_with_metrics(&config.corpus_path, engine.metrics())?;

    let mut queries = QuerySet::from_patterns(config.patterns.iter().map(String::as_str))?;
    if let Some(path) = &config.query_path {
        queries.extend(QuerySet::load(path)?);
    }
    let load_time = start.elapsed();
    debug!("Loaded corpus and {} queries in {:?}", queries.len(), load_time);

    let mut report = engine.search_corpus(&corpus, &queries)?;
    report.load_time = load_time;
    report.total_time = start.elapsed();

    engine.metrics().log_stats();
    info!(
        "Search complete. Found {} of {} queries",
        report.patterns_found,
        report.patterns_searched()
    );

    Ok(report)
}
