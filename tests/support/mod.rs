//! Shared fixtures for integration tests: an in-process fake browser.
//!
//! The fake follows a fixed redirect table instead of launching Chrome, so
//! batch and resolver tests run without a browser installed.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pdf_harvest_core::{
    BatchRunner, BrowserLauncher, BrowserSession, DownloadSettings, PdfDownloader,
    RedirectResolver, ResolveError, ResolverSettings,
};
use tempfile::TempDir;

/// Redirect table shared by every session a [`FakeLauncher`] starts.
#[derive(Debug, Default)]
pub struct RedirectTable {
    hops: HashMap<String, String>,
    unreachable: HashSet<String>,
}

impl RedirectTable {
    /// Navigating to `from` lands on `to`.
    #[must_use]
    pub fn redirect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.hops.insert(from.into(), to.into());
        self
    }

    /// Navigating to `url` fails like a DNS error would.
    #[must_use]
    pub fn unreachable(mut self, url: impl Into<String>) -> Self {
        self.unreachable.insert(url.into());
        self
    }
}

/// Launches [`FakeSession`]s and counts them.
#[derive(Debug, Clone)]
pub struct FakeLauncher {
    table: Arc<RedirectTable>,
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(table: RedirectTable) -> Self {
        Self {
            table: Arc::new(table),
            launches: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ResolveError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            table: Arc::clone(&self.table),
            closes: Arc::clone(&self.closes),
            location: "about:blank".to_string(),
        }))
    }
}

/// One fake tab. Unknown URLs load as themselves.
#[derive(Debug)]
pub struct FakeSession {
    table: Arc<RedirectTable>,
    closes: Arc<AtomicUsize>,
    location: String,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ResolveError> {
        if self.table.unreachable.contains(url) {
            return Err(ResolveError::navigation(url, "net::ERR_NAME_NOT_RESOLVED"));
        }
        self.location = self
            .table
            .hops
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        Ok(())
    }

    async fn wait_ready(&mut self, _selector: &str) -> Result<(), ResolveError> {
        Ok(())
    }

    async fn current_location(&mut self) -> Result<String, ResolveError> {
        Ok(self.location.clone())
    }

    async fn close(self: Box<Self>) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Resolver settings with no settle pause and short budgets.
pub fn fast_resolver_settings() -> ResolverSettings {
    ResolverSettings {
        settle: Duration::ZERO,
        navigation_timeout: Duration::from_secs(5),
        chain_timeout: Duration::from_secs(10),
        ..ResolverSettings::default()
    }
}

/// Downloader with a short request timeout.
pub fn fast_downloader() -> PdfDownloader {
    PdfDownloader::new(DownloadSettings {
        request_timeout: Duration::from_secs(5),
        ..DownloadSettings::default()
    })
    .expect("build downloader")
}

/// Batch runner over a fake browser writing into a fresh temp dir.
pub fn fake_runner(launcher: &FakeLauncher) -> (BatchRunner, TempDir) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let resolver = RedirectResolver::new(Arc::new(launcher.clone()), fast_resolver_settings());
    let runner = BatchRunner::new(resolver, fast_downloader(), temp_dir.path());
    (runner, temp_dir)
}

/// Sorted file names in `dir`.
pub fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| {
            entry
                .expect("dir entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}
