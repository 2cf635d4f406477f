pub mod config;
pub mod corpus;
pub mod errors;
pub mod metrics;
pub mod query;
pub mod results;
pub mod search;

pub use config::{CliOverrides, SearchConfig, Strategy};
pub use corpus::Corpus;
pub use errors::{SearchError, SearchResult};
pub use query::QuerySet;
pub use results::{QueryOutcome, SearchReport};
pub use search::{build_lps, search, LpsTable, SearchEngine, SearchMode};
