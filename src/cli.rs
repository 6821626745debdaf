//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Resolve document-provider links and store the PDFs they lead to.
///
/// Each link is opened in a fresh headless browser until its location stops
/// changing; the final URL is downloaded only if it serves a PDF. Files that
/// already exist in the output directory are never fetched again.
#[derive(Parser, Debug)]
#[command(name = "pdf-harvest")]
#[command(author, version, about)]
pub struct Args {
    /// Seed URLs to process (overrides --input and stdin)
    pub urls: Vec<String>,

    /// Read seed URLs from FILE, one per line ('-' for stdin)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory documents are stored in [default: PDFs]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file path [default: $XDG_CONFIG_HOME/pdf-harvest/config.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait after each page load for client-side redirects (0-60)
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=60))]
    pub settle_secs: Option<u64>,

    /// Seconds allowed for a single browser navigation (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub navigation_timeout_secs: Option<u64>,

    /// Seconds after which an unstable redirect chain is cut off (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub chain_timeout_secs: Option<u64>,

    /// Seconds allowed for each document download (1-3600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub request_timeout_secs: Option<u64>,

    /// Browser executable to launch (auto-detected by default)
    #[arg(long, value_name = "PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
