use clap::{Parser, Subcommand};
use colored::Colorize;
use kmpscout::{
    config::{CliOverrides, SearchConfig, Strategy},
    results::SearchReport,
    search::run,
    SearchError,
};
use std::{num::NonZeroUsize, path::PathBuf, time::Instant};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchConfig {
    /// File holding the text to search
    #[arg(short = 'c', long = "corpus")]
    corpus: Option<PathBuf>,

    /// File of whitespace-separated query words
    #[arg(short = 'q', long = "queries")]
    queries: Option<PathBuf>,

    /// Query word (can be specified multiple times)
    #[arg(short = 'p', long = "pattern")]
    patterns: Vec<String>,

    /// Number of worker threads for the parallel strategy
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Scan on a single thread instead of splitting the corpus
    #[arg(long)]
    sequential: bool,

    /// Split the corpus across worker threads (overrides the config file)
    #[arg(long, conflicts_with = "sequential")]
    parallel: bool,

    /// Show only statistics, not per-word verdicts
    #[arg(short, long)]
    stats: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up query words in a corpus
    Search(Box<CliSearchConfig>),
}

fn main() {
    if let Err(e) = run_cli() {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => {
            let start = Instant::now();

            let file_config = SearchConfig::load_from(args.config.as_deref())?;

            let strategy = if args.sequential {
                Some(Strategy::Sequential)
            } else if args.parallel {
                Some(Strategy::Parallel)
            } else {
                None
            };
            let cli_overrides = CliOverrides {
                corpus_path: args.corpus,
                query_path: args.queries,
                patterns: args.patterns,
                strategy,
                thread_count: args.threads,
                log_level: args.log_level,
                stats_only: args.stats,
            };

            let config = file_config.merge_with_cli(cli_overrides);
            init_logging(&config.log_level);

            let report = run(&config)?;
            if args.json {
                let json = serde_json::to_string_pretty(&report)
                    .map_err(|e| SearchError::config_error(format!("JSON output: {}", e)))?;
                println!("{}", json);
            } else {
                print_search_report(&report, config.stats_only);
                println!(
                    "Overall time (Including read and search): {}",
                    humantime::format_duration(start.elapsed())
                );
            }
            Ok(())
        }
    }
}

fn print_search_report(report: &SearchReport, stats_only: bool) {
    if !stats_only {
        for outcome in &report.outcomes {
            if outcome.found {
                println!("'{}' {}", outcome.pattern.blue(), "found in text!".green());
            } else {
                println!("'{}' {}", outcome.pattern.blue(), "not found in text!".red());
            }
        }
    }

    println!(
        "\nFound {} of {} words in {} bytes",
        report.patterns_found,
        report.patterns_searched(),
        report.corpus_bytes
    );
    println!(
        "Total time taken for all KMP searches: {}",
        humantime::format_duration(report.search_time)
    );
}
