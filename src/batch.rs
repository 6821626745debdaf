//! Sequential batch driver: resolve, validate, download, log, repeat.
//!
//! No item can abort the batch. Every failure is logged where it happens
//! and the driver moves on to the next seed.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use tracing::{Instrument, info, info_span, warn};
use url::Url;

use crate::download::{DownloadError, DownloadOutcome, DownloadStatus, PdfDownloader};
use crate::resolver::{RedirectResolver, Resolution, ResolveError};

/// Terminal result of processing one seed.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The browser could not produce a final URL.
    ResolutionFailed(ResolveError),
    /// The resolved string is not an absolute http(s) URL.
    InvalidFinalUrl {
        /// What the resolver returned.
        resolved: String,
    },
    /// A download was attempted.
    Attempted {
        /// How the redirect chain ended.
        resolution: Resolution,
        /// Download result.
        result: Result<DownloadOutcome, DownloadError>,
    },
}

impl ItemOutcome {
    /// Status of the download attempt, if one was made.
    #[must_use]
    pub fn download_status(&self) -> Option<DownloadStatus> {
        match self {
            Self::Attempted { result, .. } => Some(result.into()),
            Self::ResolutionFailed(_) | Self::InvalidFinalUrl { .. } => None,
        }
    }

    /// Returns true when a new file was written.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.download_status() == Some(DownloadStatus::Succeeded)
    }
}

/// Per-run tallies.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    processed: usize,
    resolution_failed: usize,
    invalid_final_url: usize,
    downloads: HashMap<DownloadStatus, usize>,
}

impl BatchStats {
    /// Records one item.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        self.processed += 1;
        match outcome {
            ItemOutcome::ResolutionFailed(_) => self.resolution_failed += 1,
            ItemOutcome::InvalidFinalUrl { .. } => self.invalid_final_url += 1,
            ItemOutcome::Attempted { result, .. } => {
                *self.downloads.entry(result.into()).or_default() += 1;
            }
        }
    }

    /// Seeds processed.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Seeds whose resolution failed.
    #[must_use]
    pub fn resolution_failed(&self) -> usize {
        self.resolution_failed
    }

    /// Seeds whose final URL was rejected.
    #[must_use]
    pub fn invalid_final_url(&self) -> usize {
        self.invalid_final_url
    }

    /// Download attempts that ended in `status`.
    #[must_use]
    pub fn count(&self, status: DownloadStatus) -> usize {
        self.downloads.get(&status).copied().unwrap_or(0)
    }

    /// Files written.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.count(DownloadStatus::Succeeded)
    }

    /// Items skipped because their file already existed.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(DownloadStatus::SkippedExists)
    }

    /// Items that failed at any stage.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.processed - self.saved() - self.skipped()
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} saved, {} skipped, {} failed",
            self.processed,
            self.saved(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Returns true if `url` is an absolute http(s) URL with a host.
#[must_use]
pub fn is_valid_final_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|parsed| {
        matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
    })
}

/// Runs seeds through resolver and downloader, one at a time.
#[derive(Debug)]
pub struct BatchRunner {
    resolver: RedirectResolver,
    downloader: PdfDownloader,
    output_dir: PathBuf,
}

impl BatchRunner {
    /// Creates a runner writing into `output_dir`, which must already exist.
    #[must_use]
    pub fn new(
        resolver: RedirectResolver,
        downloader: PdfDownloader,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            downloader,
            output_dir: output_dir.into(),
        }
    }

    /// Processes every seed in order and returns the tallies.
    pub async fn run<I, S>(&self, seeds: I) -> BatchStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = BatchStats::default();
        for (index, seed) in seeds.into_iter().enumerate() {
            let seed = seed.as_ref();
            let span = info_span!("item", index = index + 1, seed = %seed);
            let outcome = self.process(seed).instrument(span).await;
            stats.record(&outcome);
        }
        info!(
            processed = stats.processed(),
            saved = stats.saved(),
            skipped = stats.skipped(),
            failed = stats.failed(),
            "batch complete"
        );
        stats
    }

    /// Resolves and downloads a single seed.
    pub async fn process(&self, seed: &str) -> ItemOutcome {
        let resolution = match self.resolver.resolve(seed).await {
            Ok(resolution) => resolution,
            Err(error) => {
                warn!(error = %error, "skipping item: resolution failed");
                return ItemOutcome::ResolutionFailed(error);
            }
        };

        if !is_valid_final_url(&resolution.final_url) {
            warn!(resolved = %resolution.final_url, "skipping item: invalid final URL");
            return ItemOutcome::InvalidFinalUrl {
                resolved: resolution.final_url,
            };
        }

        let result = self
            .downloader
            .download(&resolution.final_url, &self.output_dir)
            .await;
        match &result {
            Ok(DownloadOutcome::Saved { path, bytes }) => info!(
                url = %resolution.final_url,
                path = %path.display(),
                bytes,
                "saved"
            ),
            Ok(DownloadOutcome::Skipped { path }) => info!(
                url = %resolution.final_url,
                path = %path.display(),
                "already present"
            ),
            Err(error) => warn!(
                status = %DownloadStatus::from(error),
                error = %error,
                "download failed"
            ),
        }

        ItemOutcome::Attempted { resolution, result }
    }
}
