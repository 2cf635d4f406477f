use std::path::Path;
use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// Ordered list of query words to look up in the corpus.
///
/// Words are separated by ASCII whitespace, so line endings never end up
/// inside a pattern. Duplicates are kept; each occurrence gets an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySet {
    patterns: Vec<Vec<u8>>,
}

impl QuerySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits a query source into words
    pub fn parse(source: &[u8]) -> Self {
        let patterns = source
            .split(|b| b.is_ascii_whitespace())
            .filter(|word| !word.is_empty())
            .map(<[u8]>::to_vec)
            .collect();
        Self { patterns }
    }

    /// Reads and splits a query file
    pub fn load(path: &Path) -> SearchResult<Self> {
        let source = std::fs::read(path).map_err(|e| SearchError::from_io(e, path))?;
        let queries = Self::parse(&source);
        debug!("Read {} queries from {}", queries.len(), path.display());
        Ok(queries)
    }

    /// Takes patterns as given, rejecting empty ones
    pub fn from_patterns<I, P>(patterns: I) -> SearchResult<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<Vec<u8>>,
    {
        let mut queries = Self::new();
        for pattern in patterns {
            queries.push(pattern)?;
        }
        Ok(queries)
    }

    pub fn push(&mut self, pattern: impl Into<Vec<u8>>) -> SearchResult<()> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(SearchError::EmptyPattern);
        }
        self.patterns.push(pattern);
        Ok(())
    }

    /// Appends every query of `other`
    pub fn extend(&mut self, other: QuerySet) {
        self.patterns.extend(other.patterns);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.patterns.iter().map(Vec::as_slice)
    }
}
