use memmap2::Mmap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::Deref;
use std::path::Path;
use tracing::{debug, trace, warn};

use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;

const BUFFER_CAPACITY: usize = 65536;
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// The text being searched, held in memory as raw bytes.
///
/// No encoding is assumed: matching is byte equality.
#[derive(Debug)]
pub enum Corpus {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Corpus {
    /// Wraps bytes that are already in memory
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Corpus::Owned(bytes.into())
    }

    /// Loads a corpus file, memory-mapping it when it is large
    pub fn load(path: &Path) -> SearchResult<Self> {
        Self::load_with_metrics(path, &SearchMetrics::new())
    }

    pub fn load_with_metrics(path: &Path, metrics: &SearchMetrics) -> SearchResult<Self> {
        trace!("Loading corpus: {}", path.display());

        let file = File::open(path).map_err(|e| SearchError::from_io(e, path))?;
        let size = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Failed to get metadata for {}: {}", path.display(), e);
                0
            }
        };

        let corpus = if size >= LARGE_FILE_THRESHOLD {
            // SAFETY: the file must not be truncated while the corpus is alive.
            let mmap = unsafe { Mmap::map(&file) }.map_err(SearchError::IoError)?;
            Corpus::Mapped(mmap)
        } else {
            let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
            let mut bytes = Vec::with_capacity(size as usize);
            reader
                .read_to_end(&mut bytes)
                .map_err(SearchError::IoError)?;
            Corpus::Owned(bytes)
        };

        metrics.record_corpus_load(corpus.len() as u64, corpus.is_mapped());
        debug!(
            "Loaded {} bytes from {} ({})",
            corpus.len(),
            path.display(),
            if corpus.is_mapped() { "mapped" } else { "read" }
        );
        Ok(corpus)
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Corpus::Owned(bytes) => bytes.as_slice(),
            Corpus::Mapped(mmap) => &mmap[..],
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, Corpus::Mapped(_))
    }
}

impl Deref for Corpus {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Corpus {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
