//! Sumi-Index main entry point
//!
//! This is the command-line interface for the Sumi-Index topical crawler.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use sumi_index::config::{load_config_with_hash, Config};
use sumi_index::crawler::run_crawl;
use sumi_index::output::{load_statistics, print_report, print_search_results, print_statistics};
use sumi_index::{search, InvertedIndex};
use tracing_subscriber::EnvFilter;

/// Sumi-Index: a polite topical crawler with a keyword index
///
/// Sumi-Index crawls the web from a seed URL while respecting robots.txt,
/// indexes the words of on-topic pages and answers ranked keyword queries
/// against the saved index.
#[derive(Parser, Debug)]
#[command(name = "sumi-index")]
#[command(version = "1.0.0")]
#[command(about = "A polite topical crawler with a keyword index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start from an empty index instead of the saved one
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "search"])]
    dry_run: bool,

    /// Show statistics of the saved index and exit
    #[arg(long, conflicts_with_all = ["dry_run", "search"])]
    stats: bool,

    /// Query the saved index with comma-separated keywords and exit
    #[arg(long, value_name = "KEYWORDS", conflicts_with_all = ["dry_run", "stats"])]
    search: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(keywords) = cli.search.as_deref() {
        handle_search(&config, keywords)?;
    } else {
        handle_crawl(config, config_hash, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_index=info,warn"),
            1 => EnvFilter::new("sumi_index=debug,info"),
            2 => EnvFilter::new("sumi_index=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Sumi-Index Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", crawler.seed);
    println!("  Target pages: {}", crawler.target_count);
    println!("  Workers: {}", crawler.workers);
    match crawler.time_limit_secs {
        0 => println!("  Time limit: none"),
        secs => println!("  Time limit: {}s", secs),
    }
    println!("  Page timeout: {}s", crawler.page_timeout_secs);
    println!("  Robots timeout: {}s", crawler.robots_timeout_secs);
    if let Some(scope) = &crawler.link_scope {
        println!("  Link scope: #{}", scope);
    }

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nTopic:");
    if config.topic.keywords.is_empty() {
        println!("  (none, every page is indexed)");
    } else {
        println!("  Keywords: {}", config.topic.keywords.join(", "));
        println!("  Mode: {}", config.topic.mode);
    }

    println!("\nOutput:");
    println!("  Index: {}", config.output.index_path);
    match config.output.export_interval_secs {
        0 => println!("  Export: at the end of the crawl"),
        secs => println!("  Export: every {}s and at the end of the crawl", secs),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics of the saved index
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.index_path);
    println!("Index: {}\n", path.display());

    let stats = load_statistics(path)
        .with_context(|| format!("Failed to read index {}", path.display()))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --search mode: ranked query against the saved index
fn handle_search(config: &Config, raw_keywords: &str) -> anyhow::Result<()> {
    let keywords: Vec<String> = raw_keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();

    if keywords.is_empty() {
        bail!("--search needs at least one keyword");
    }

    let path = Path::new(&config.output.index_path);
    let index = InvertedIndex::import(path)
        .with_context(|| format!("Failed to read index {}", path.display()))?;

    let hits = search(&index, &keywords);
    tracing::info!("{} pages match {:?}", hits.len(), keywords);
    print_search_results(&keywords, &hits);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String, fresh: bool) -> anyhow::Result<()> {
    match run_crawl(config, Some(config_hash), fresh).await {
        Ok(report) => {
            tracing::info!("Crawl completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
