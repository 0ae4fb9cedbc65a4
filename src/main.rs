// src/main.rs
// =============================================================================
// Entry point of the webcrawler CLI.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Load and validate the JSON configuration
// 3. Build a tokio runtime with one worker thread per unit of parallelism
// 4. Wrap the page source and the crawler in the profiler
// 5. Crawl, then write the ranked result and the profiling report
// 6. Exit with 0 on success, 2 on any error
// =============================================================================

mod cli;
mod config;
mod crawl;
mod error;
mod page;
mod profiler;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::{ConfigLoader, CrawlerConfig, Implementation};
use crawl::{CrawlResultWriter, ParallelCrawler, SequentialCrawler, WebCrawler};
use page::{HtmlPageSource, PageSource};
use profiler::Profiler;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout stays clean for the JSON result
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("webcrawler=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = ConfigLoader::new(&cli.config)
        .load()
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    // The runtime's worker threads are the crawl's worker pool
    let workers = crawl::clamp_parallelism(config.parallelism);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .enable_all()
        .build()
        .context("starting the worker pool")?;

    runtime.block_on(crawl_and_report(config))
}

async fn crawl_and_report(config: CrawlerConfig) -> Result<()> {
    let profiler = Profiler::new();

    let source = HtmlPageSource::new(config.ignored_words.clone())
        .context("creating the HTTP client")?;
    let source: Arc<dyn PageSource> = Arc::new(profiler.wrap(source, &["fetch"])?);

    let crawler: Box<dyn WebCrawler> = match config.implementation {
        Implementation::Parallel => Box::new(
            profiler.wrap(ParallelCrawler::new(source, &config), &["crawl"])?,
        ),
        Implementation::Sequential => Box::new(
            profiler.wrap(SequentialCrawler::new(source, &config), &["crawl"])?,
        ),
    };

    info!(
        implementation = ?config.implementation,
        max_parallelism = crawler.max_parallelism(),
        "crawler ready"
    );

    let result = crawler.crawl(&config.start_pages).await;

    let writer = CrawlResultWriter::new(&result);
    match &config.result_path {
        Some(path) => writer.write_path(path)?,
        None => writer
            .write(&mut io::stdout().lock())
            .context("writing the crawl result to stdout")?,
    }

    match &config.profile_output_path {
        Some(path) => profiler.write_report_path(path)?,
        None => profiler
            .write_report(&mut io::stdout().lock())
            .context("writing the profile to stdout")?,
    }

    Ok(())
}
