//! Headless Chromium sessions via the DevTools protocol.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::ResolveError;
use super::browser::{BrowserLauncher, BrowserSession};

/// Interval between readiness probes while waiting for a selector.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default budget for the browser process to expose its DevTools endpoint.
pub const DEFAULT_LAUNCH_TIMEOUT_SECS: u64 = 30;

/// Flags every session is started with, on top of headless mode.
const BASE_ARGS: &[&str] = &["--disable-gpu"];

static PROFILE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Launch options for [`ChromeLauncher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeSettings {
    /// Explicit browser executable; auto-detected when `None`.
    pub executable: Option<PathBuf>,
    /// Extra command-line flags appended after the built-in ones.
    pub extra_args: Vec<String>,
    /// Budget for the browser process to come up.
    pub launch_timeout: Duration,
}

impl Default for ChromeSettings {
    fn default() -> Self {
        Self {
            executable: None,
            extra_args: Vec::new(),
            launch_timeout: Duration::from_secs(DEFAULT_LAUNCH_TIMEOUT_SECS),
        }
    }
}

/// Launches one headless Chromium process per session.
///
/// Each process gets its own throwaway profile directory, so no cookies or
/// cache survive from one resolution to the next.
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    settings: ChromeSettings,
}

impl ChromeLauncher {
    /// Creates a launcher with the given options.
    #[must_use]
    pub fn new(settings: ChromeSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig, ResolveError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .incognito()
            .user_data_dir(profile_dir)
            .launch_timeout(self.settings.launch_timeout)
            .args(BASE_ARGS.iter().copied())
            .args(self.settings.extra_args.iter().map(String::as_str));
        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }
        builder.build().map_err(ResolveError::browser_launch)
    }
}

fn next_profile_dir() -> PathBuf {
    let n = PROFILE_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("pdf-harvest-{}-{n}", std::process::id()))
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    fn name(&self) -> &'static str {
        "chromium"
    }

    #[instrument(level = "debug", skip(self))]
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ResolveError> {
        let profile_dir = next_profile_dir();
        let config = self.browser_config(&profile_dir)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ResolveError::browser_launch(e.to_string()))?;

        // The CDP connection only makes progress while its handler is polled.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(error) = event {
                    debug!(error = %error, "browser handler stopped");
                    break;
                }
            }
        });

        match browser.new_page("about:blank").await {
            Ok(page) => {
                debug!(profile = %profile_dir.display(), "browser session started");
                Ok(Box::new(ChromeSession {
                    browser,
                    page,
                    handler_task,
                    profile_dir,
                    last_target: String::from("about:blank"),
                }))
            }
            Err(error) => {
                if let Err(close_error) = browser.close().await {
                    warn!(error = %close_error, "failed to close browser after tab error");
                }
                handler_task.abort();
                remove_profile_dir(&profile_dir).await;
                Err(ResolveError::browser_launch(error.to_string()))
            }
        }
    }
}

/// A live headless browser with a single tab.
struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    profile_dir: PathBuf,
    last_target: String,
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ResolveError> {
        url.clone_into(&mut self.last_target);
        self.page
            .goto(url)
            .await
            .map_err(|e| ResolveError::navigation(url, e.to_string()))?;
        Ok(())
    }

    async fn wait_ready(&mut self, selector: &str) -> Result<(), ResolveError> {
        // Bounded by the caller's per-navigation timeout.
        loop {
            match self.page.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(error) if is_connection_error(&error) => {
                    return Err(ResolveError::navigation(
                        &self.last_target,
                        error.to_string(),
                    ));
                }
                Err(_) => tokio::time::sleep(READY_POLL_INTERVAL).await,
            }
        }
    }

    async fn current_location(&mut self) -> Result<String, ResolveError> {
        let location = self
            .page
            .url()
            .await
            .map_err(|e| ResolveError::navigation(&self.last_target, e.to_string()))?;
        location.ok_or_else(|| ResolveError::location_unavailable(&self.last_target))
    }

    async fn close(self: Box<Self>) {
        let Self {
            mut browser,
            page,
            handler_task,
            profile_dir,
            ..
        } = *self;

        drop(page);
        if let Err(error) = browser.close().await {
            warn!(error = %error, "failed to close browser");
        }
        if let Err(error) = browser.wait().await {
            warn!(error = %error, "failed to reap browser process");
        }
        if let Err(error) = handler_task.await {
            debug!(error = %error, "browser handler task ended abnormally");
        }
        remove_profile_dir(&profile_dir).await;
        debug!("browser session closed");
    }
}

/// True when the DevTools connection itself is gone, so polling cannot succeed.
fn is_connection_error(error: &CdpError) -> bool {
    matches!(
        error,
        CdpError::Ws(_) | CdpError::Io(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse
    )
}

async fn remove_profile_dir(path: &Path) {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {}
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => warn!(
            path = %path.display(),
            error = %error,
            "failed to remove browser profile directory"
        ),
    }
}
