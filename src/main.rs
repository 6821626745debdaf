//! CLI entry point for the pdf-harvest tool.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pdf_harvest_core::config::{load_default_file_config, load_file_config};
use pdf_harvest_core::{
    BatchRunner, ChromeLauncher, FileConfig, PdfDownloader, RedirectResolver, SeedList,
    default_seed_list, ensure_output_dir, parse_seed_list,
};
use tracing::{debug, info, warn};

mod cli;
mod config_runtime;

use cli::Args;
use config_runtime::{build_run_settings, default_log_directive};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let file_config = load_config(&args)?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > info
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(default_log_directive(&args, file_config.as_ref()))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let settings = build_run_settings(&args, file_config.as_ref())?;
    debug!(?settings, "run settings resolved");

    ensure_output_dir(&settings.output_dir).await.with_context(|| {
        format!(
            "cannot prepare output directory '{}'",
            settings.output_dir.display()
        )
    })?;

    let seeds = read_seeds(&args)?;
    if seeds.is_empty() {
        info!("No seed URLs to process");
        return Ok(());
    }
    info!(
        seeds = seeds.len(),
        duplicates = seeds.duplicates,
        output_dir = %settings.output_dir.display(),
        "pdf-harvest starting"
    );

    let launcher = Arc::new(ChromeLauncher::new(settings.chrome));
    let resolver = RedirectResolver::new(launcher, settings.resolver);
    let downloader =
        PdfDownloader::new(settings.download).context("failed to build HTTP client")?;
    let runner = BatchRunner::new(resolver, downloader, settings.output_dir);

    let stats = runner.run(seeds.iter()).await;
    info!(summary = %stats, "pdf-harvest finished");

    Ok(())
}

/// Loads the explicit `--config` file, or the default one when present.
fn load_config(args: &Args) -> Result<Option<FileConfig>> {
    if let Some(path) = &args.config {
        let config = load_file_config(path)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        return Ok(Some(config));
    }
    load_default_file_config().context("invalid default config file")
}

/// Picks the seed source: positional URLs, `--input`, piped stdin, built-in list.
fn read_seeds(args: &Args) -> Result<SeedList> {
    if !args.urls.is_empty() {
        if args.input.is_some() {
            warn!("positional URLs given; ignoring --input");
        }
        return Ok(parse_seed_list(&args.urls.join("\n")));
    }

    if let Some(path) = &args.input {
        let text = if path.as_os_str() == "-" {
            read_stdin()?
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read seed file '{}'", path.display()))?
        };
        return Ok(parse_seed_list(&text));
    }

    if !io::stdin().is_terminal() {
        let text = read_stdin()?;
        if !text.trim().is_empty() {
            return Ok(parse_seed_list(&text));
        }
    }

    debug!("no input supplied; using built-in provider list");
    Ok(default_seed_list())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read seeds from stdin")?;
    Ok(buffer)
}
