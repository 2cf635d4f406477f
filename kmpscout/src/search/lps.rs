use std::ops::Index;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};

/// Failure function of a pattern.
///
/// `table[k]` is the length of the longest proper prefix of `pattern[..=k]`
/// that is also a suffix of it. Always `table[0] == 0` and `table[k] <= k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LpsTable {
    table: Vec<usize>,
}

impl LpsTable {
    /// Builds the failure function in O(M), rejecting empty patterns
    pub fn build(pattern: &[u8]) -> SearchResult<Self> {
        if pattern.is_empty() {
            return Err(SearchError::EmptyPattern);
        }

        let mut table = vec![0; pattern.len()];
        let mut len = 0;
        let mut i = 1;

        while i < pattern.len() {
            if pattern[i] == pattern[len] {
                len += 1;
                table[i] = len;
                i += 1;
            } else if len != 0 {
                // Reuse the previous failure link; `i` stays put.
                len = table[len - 1];
            } else {
                table[i] = 0;
                i += 1;
            }
        }

        trace!("Built LPS table of length {}", table.len());
        Ok(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Never true for a built table; provided for API completeness
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.table
    }

    /// Where the pattern cursor resumes after a mismatch at `j` (requires `j > 0`)
    #[inline]
    pub fn fallback(&self, j: usize) -> usize {
        self.table[j - 1]
    }

    /// Approximate heap footprint, used for cache accounting
    pub fn heap_size(&self) -> usize {
        self.table.len() * std::mem::size_of::<usize>()
    }
}

impl Index<usize> for LpsTable {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.table[index]
    }
}

/// Computes the failure function of `pattern`
pub fn build_lps(pattern: &[u8]) -> SearchResult<LpsTable> {
    LpsTable::build(pattern)
}
