//! Exact substring search with Knuth-Morris-Pratt.
//!
//! A pattern's failure function ([`LpsTable`]) is built once, then one of two
//! interchangeable strategies answers whether the pattern occurs in the text:
//!
//! - [`SearchMode::Sequential`] scans the whole text in a single pass.
//! - [`SearchMode::Parallel`] splits the text into overlapping segments, scans
//!   them on a pool of worker threads and ORs the per-worker verdicts.
//!
//! Both strategies return the same boolean for every valid input.
//!
//! ```rust
//! use kmpscout::{build_lps, search, SearchMode};
//!
//! let lps = build_lps(b"ABABCABAB").unwrap();
//! assert_eq!(lps.as_slice(), &[0, 0, 1, 2, 0, 1, 2, 3, 4]);
//!
//! let corpus = b"ABABDABACDABABCABAB";
//! assert!(search(b"ABABCABAB", corpus, SearchMode::Sequential).unwrap());
//! assert!(search(b"ABABCABAB", corpus, SearchMode::Parallel(4)).unwrap());
//! ```

pub mod engine;
pub mod lps;
pub mod matcher;
pub mod parallel;

pub use engine::{run, SearchEngine};
pub use lps::{build_lps, LpsTable};
pub use matcher::{scan, KmpPattern, LpsCache};
pub use parallel::{parallel_search, plan_segments, ParallelMatcher, Segment};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SearchError, SearchResult};

/// Which matcher strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Sequential,
    /// Worker count; zero is rejected with `InvalidWorkerCount`
    Parallel(usize),
}

impl SearchMode {
    /// Rejects a parallel mode with no workers
    pub fn validate(self) -> SearchResult<Self> {
        match self {
            SearchMode::Parallel(0) => Err(SearchError::InvalidWorkerCount(0)),
            mode => Ok(mode),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Sequential => write!(f, "sequential"),
            SearchMode::Parallel(workers) => write!(f, "parallel ({} workers)", workers),
        }
    }
}

/// Returns true iff `pattern` occurs as a contiguous byte run in `corpus`.
///
/// Inputs are validated before any scan: an empty pattern yields
/// `EmptyPattern` and `Parallel(0)` yields `InvalidWorkerCount`.
pub fn search(pattern: &[u8], corpus: &[u8], mode: SearchMode) -> SearchResult<bool> {
    let mode = mode.validate()?;
    let lps = build_lps(pattern)?;
    match mode {
        SearchMode::Sequential => Ok(scan(pattern, &lps, corpus)),
        SearchMode::Parallel(workers) => parallel_search(pattern, &lps, corpus, workers),
    }
}
