//! Merges CLI flags, file config and built-in defaults into run settings.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use pdf_harvest_core::{ChromeSettings, DownloadSettings, FileConfig, ResolverSettings};

use crate::cli::Args;

/// Output directory used when neither flag nor config names one.
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "PDFs";

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) output_dir: PathBuf,
    pub(crate) resolver: ResolverSettings,
    pub(crate) chrome: ChromeSettings,
    pub(crate) download: DownloadSettings,
}

/// Precedence: CLI flag, then config file, then built-in default.
///
/// Fails when the settle pause would use up the whole navigation budget,
/// since every seed would then time out.
pub(crate) fn build_run_settings(args: &Args, file: Option<&FileConfig>) -> Result<RunSettings> {
    let file_value = |pick: fn(&FileConfig) -> Option<u64>| file.and_then(pick);

    let mut resolver = ResolverSettings::default();
    if let Some(secs) = args.settle_secs.or_else(|| file_value(|f| f.settle_secs)) {
        resolver.settle = Duration::from_secs(secs);
    }
    if let Some(secs) = args
        .navigation_timeout_secs
        .or_else(|| file_value(|f| f.navigation_timeout_secs))
    {
        resolver.navigation_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = args
        .chain_timeout_secs
        .or_else(|| file_value(|f| f.chain_timeout_secs))
    {
        resolver.chain_timeout = Duration::from_secs(secs);
    }
    if resolver.settle >= resolver.navigation_timeout {
        bail!(
            "settle time ({}s) must be shorter than the navigation timeout ({}s)",
            resolver.settle.as_secs(),
            resolver.navigation_timeout.as_secs()
        );
    }

    let mut download = DownloadSettings::default();
    if let Some(secs) = args
        .request_timeout_secs
        .or_else(|| file_value(|f| f.request_timeout_secs))
    {
        download.request_timeout = Duration::from_secs(secs);
    }
    if let Some(user_agent) = file.and_then(|f| f.user_agent.clone()) {
        download.user_agent = user_agent;
    }

    let chrome = ChromeSettings {
        executable: args
            .chrome_path
            .clone()
            .or_else(|| file.and_then(|f| f.chrome_path.clone())),
        extra_args: file
            .and_then(|f| f.browser_args.clone())
            .unwrap_or_default(),
        ..ChromeSettings::default()
    };

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file.and_then(|f| f.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    Ok(RunSettings {
        output_dir,
        resolver,
        chrome,
        download,
    })
}

/// Default log filter when `RUST_LOG` is unset.
///
/// Priority: quiet flag > verbose flag > config verbosity > info.
pub(crate) fn default_log_directive(args: &Args, file: Option<&FileConfig>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => file
            .and_then(|f| f.verbosity)
            .map_or("info", |v| v.filter_directive()),
        1 => "debug",
        _ => "trace",
    }
}
