use serde::Serialize;
use std::time::Duration;

/// Verdict for a single query word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryOutcome {
    /// The query as text; invalid UTF-8 is replaced
    pub pattern: String,
    pub found: bool,
}

impl QueryOutcome {
    pub fn new(pattern: &[u8], found: bool) -> Self {
        Self {
            pattern: String::from_utf8_lossy(pattern).into_owned(),
            found,
        }
    }
}

/// Outcome of searching every query against one corpus
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchReport {
    /// Verdicts in query order
    pub outcomes: Vec<QueryOutcome>,
    /// Number of queries found in the corpus
    pub patterns_found: usize,
    /// Size of the searched corpus
    pub corpus_bytes: usize,
    /// Time spent reading the corpus and queries
    #[serde(with = "human_duration")]
    pub load_time: Duration,
    /// Time spent in all searches
    #[serde(with = "human_duration")]
    pub search_time: Duration,
    /// Load plus search time
    #[serde(with = "human_duration")]
    pub total_time: Duration,
}

impl SearchReport {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_outcome(&mut self, outcome: QueryOutcome) {
        if outcome.found {
            self.patterns_found += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn patterns_searched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn patterns_missing(&self) -> usize {
        self.outcomes.len() - self.patterns_found
    }

    /// Merges another report, e.g. from a second batch of queries
    pub fn merge(&mut self, other: SearchReport) {
        self.patterns_found += other.patterns_found;
        self.outcomes.extend(other.outcomes);
        self.load_time += other.load_time;
        self.search_time += other.search_time;
        self.total_time += other.total_time;
    }
}

/// Serializes durations as human-readable strings such as `"1s 250ms"`
mod human_duration {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*duration))
    }
}
