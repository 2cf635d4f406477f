use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};
use crate::search::SearchMode;

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// Loaded from, in increasing order of precedence:
/// 1. Global `$HOME/.config/kmpscout/config.yaml`
/// 2. Local `.kmpscout.yaml` in the current directory
/// 3. A file passed with `--config`
///
/// Command-line arguments override all of them (see [`SearchConfig::merge_with_cli`]).
///
/// # Configuration Format
///
/// ```yaml
/// # Text to search
/// corpus_path: "Shakespeare.txt"
///
/// # Whitespace-separated query words
/// query_path: "queries.txt"
///
/// # Extra query words
/// patterns: ["Romeo", "Juliet"]
///
/// # sequential or parallel
/// strategy: parallel
///
/// # Worker count for the parallel strategy (default: CPU cores)
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
///
/// # Print only the summary
/// stats_only: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// File holding the text to search
    #[serde(default)]
    pub corpus_path: PathBuf,

    /// Optional file of whitespace-separated query words
    #[serde(default)]
    pub query_path: Option<PathBuf>,

    /// Query words given directly
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Matcher strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Number of workers for the parallel strategy
    /// Defaults to number of CPU cores if not specified
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to only print the found/missing summary
    #[serde(default)]
    pub stats_only: bool,
}

/// Matcher strategy as named in configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Sequential,
    #[default]
    Parallel,
}

/// Values given on the command line; `None` or empty means "not given"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub corpus_path: Option<PathBuf>,
    pub query_path: Option<PathBuf>,
    pub patterns: Vec<String>,
    pub strategy: Option<Strategy>,
    pub thread_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
    pub stats_only: bool,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::new(),
            query_path: None,
            patterns: Vec::new(),
            strategy: Strategy::default(),
            thread_count: default_thread_count(),
            log_level: default_log_level(),
            stats_only: false,
        }
    }
}

impl SearchConfig {
    /// Creates a configuration for searching `corpus_path`
    pub fn new(corpus_path: impl Into<PathBuf>) -> Self {
        Self {
            corpus_path: corpus_path.into(),
            ..Default::default()
        }
    }

    pub fn with_query_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.query_path = Some(path.into());
        self
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_thread_count(mut self, count: NonZeroUsize) -> Self {
        self.thread_count = count;
        self
    }

    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus `config_path`
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("kmpscout/config.yaml")),
            Some(PathBuf::from(".kmpscout.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist.
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// Anything given on the command line wins, even when it equals the default.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(corpus_path) = cli.corpus_path {
            self.corpus_path = corpus_path;
        }
        if cli.query_path.is_some() {
            self.query_path = cli.query_path;
        }
        if !cli.patterns.is_empty() {
            self.patterns = cli.patterns;
        }
        if let Some(strategy) = cli.strategy {
            self.strategy = strategy;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        if cli.stats_only {
            self.stats_only = true;
        }
        self
    }

    /// The matcher strategy this configuration asks for
    pub fn search_mode(&self) -> SearchMode {
        match self.strategy {
            Strategy::Sequential => SearchMode::Sequential,
            Strategy::Parallel => SearchMode::Parallel(self.thread_count.get()),
        }
    }

    /// Checks that there is something to search and something to look for
    pub fn validate(&self) -> SearchResult<()> {
        if self.corpus_path.as_os_str().is_empty() {
            return Err(SearchError::config_error("No corpus file given"));
        }
        if self.query_path.is_none() && self.patterns.is_empty() {
            return Err(SearchError::config_error(
                "No queries given (use a query file or inline patterns)",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, config_path)
    }

    #[test]
    fn test_load_config_file() {
        let (_dir, config_path) = write_config(
            r#"
            corpus_path: "Shakespeare.txt"
            query_path: "queries.txt"
            patterns: ["Romeo", "Juliet"]
            strategy: sequential
            thread_count: 4
            log_level: "debug"
            stats_only: true
        "#,
        );

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.corpus_path, PathBuf::from("Shakespeare.txt"));
        assert_eq!(config.query_path, Some(PathBuf::from("queries.txt")));
        assert_eq!(config.patterns, vec!["Romeo", "Juliet"]);
        assert_eq!(config.strategy, Strategy::Sequential);
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(config.log_level, "debug");
        assert!(config.stats_only);
        assert_eq!(config.search_mode(), SearchMode::Sequential);
    }

    #[test]
    fn test_default_values() {
        let (_dir, config_path) = write_config(
            r#"
            corpus_path: "book.txt"
        "#,
        );

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.corpus_path, PathBuf::from("book.txt"));
        assert_eq!(config.query_path, None);
        assert!(config.patterns.is_empty());
        assert_eq!(config.strategy, Strategy::Parallel);
        assert_eq!(config.thread_count, default_thread_count());
        assert_eq!(config.log_level, "warn");
        assert!(!config.stats_only);
        assert_eq!(
            config.search_mode(),
            SearchMode::Parallel(num_cpus::get().max(1))
        );
    }

    #[test]
    fn test_invalid_config() {
        let (_dir, config_path) = write_config(
            r#"
            corpus_path: []
            strategy: "sideways"
            thread_count: 0
        "#,
        );

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SearchConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let file_config = SearchConfig::new("file_corpus.txt")
            .with_query_path("file_queries.txt")
            .with_patterns(["alpha"])
            .with_strategy(Strategy::Sequential)
            .with_thread_count(NonZeroUsize::new(2).unwrap());

        let cli = CliOverrides {
            corpus_path: Some(PathBuf::from("cli_corpus.txt")),
            patterns: vec!["beta".to_string()],
            log_level: Some("debug".to_string()),
            stats_only: true,
            ..Default::default()
        };

        let merged = file_config.merge_with_cli(cli);
        assert_eq!(merged.corpus_path, PathBuf::from("cli_corpus.txt")); // CLI value
        assert_eq!(merged.query_path, Some(PathBuf::from("file_queries.txt"))); // File value (CLI None)
        assert_eq!(merged.patterns, vec!["beta"]); // CLI value
        assert_eq!(merged.strategy, Strategy::Sequential); // File value (CLI None)
        assert_eq!(merged.thread_count, NonZeroUsize::new(2).unwrap()); // File value (CLI None)
        assert_eq!(merged.log_level, "debug"); // CLI value
        assert!(merged.stats_only); // CLI value
    }

    #[test]
    fn test_cli_values_equal_to_defaults_still_override() {
        let file_config = SearchConfig::new("book.txt")
            .with_strategy(Strategy::Sequential)
            .with_thread_count(NonZeroUsize::new(2).unwrap());
        let file_config = SearchConfig {
            log_level: "debug".to_string(),
            ..file_config
        };

        let cli = CliOverrides {
            strategy: Some(Strategy::default()),
            thread_count: Some(default_thread_count()),
            log_level: Some(default_log_level()),
            ..Default::default()
        };

        let merged = file_config.merge_with_cli(cli);
        assert_eq!(merged.strategy, Strategy::Parallel);
        assert_eq!(merged.thread_count, default_thread_count());
        assert_eq!(merged.log_level, "warn");
        assert_eq!(merged.corpus_path, PathBuf::from("book.txt"));
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let file_config = SearchConfig::new("book.txt")
            .with_patterns(["thee"])
            .with_strategy(Strategy::Sequential);
        let merged = file_config.clone().merge_with_cli(CliOverrides::default());
        assert_eq!(merged, file_config);
    }

    #[test]
    fn test_validate() {
        assert!(SearchConfig::default().validate().is_err());
        assert!(SearchConfig::new("book.txt").validate().is_err());
        assert!(SearchConfig::new("book.txt")
            .with_patterns(["thee"])
            .validate()
            .is_ok());
        assert!(SearchConfig::new("book.txt")
            .with_query_path("q.txt")
            .validate()
            .is_ok());
    }
}
