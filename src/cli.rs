// src/cli.rs
// =============================================================================
// Command-line interface, parsed with clap's derive API.
//
// Everything about the crawl itself lives in the JSON configuration file;
// the command line only says where that file is and how chatty to be.
// =============================================================================

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "webcrawler",
    version,
    about = "Crawl web pages in parallel and rank the most popular words",
    long_about = "webcrawler starts from the pages listed in a JSON configuration file, \
                  follows links up to a maximum depth and time limit, and reports the most \
                  frequent words it found along with a profile of where the time went."
)]
pub struct Cli {
    /// Path to the JSON crawl configuration
    ///
    /// Example: webcrawler config/sample_config.json
    pub config: PathBuf,

    /// Log every visited page and every page that failed to load
    #[arg(short, long)]
    pub verbose: bool,
}
