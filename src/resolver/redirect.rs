//! Redirect-chain resolution by repeated browser navigation.
//!
//! A plain HTTP client only sees 3xx redirects. Meta-refresh tags and
//! script-driven navigation need a real browser, so the resolver loads the
//! seed, lets the page settle, reads where the browser ended up, and repeats
//! from there until two consecutive observations agree.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use super::ResolveError;
use super::browser::{BrowserLauncher, BrowserSession};

/// Default pause after the page is ready, for deferred client-side redirects.
pub const DEFAULT_SETTLE_SECS: u64 = 3;

/// Default budget for a single navigate/wait/observe step.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 120;

/// Default ceiling for a whole redirect chain.
pub const DEFAULT_CHAIN_TIMEOUT_SECS: u64 = 180;

/// Selector that marks a page as loaded.
pub const DEFAULT_READY_SELECTOR: &str = "body";

/// Timing and readiness knobs for [`RedirectResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Pause after the page is ready before reading the location.
    pub settle: Duration,
    /// Budget for one navigate + wait + settle + observe step.
    pub navigation_timeout: Duration,
    /// Ceiling after which an unstable chain is returned as-is.
    pub chain_timeout: Duration,
    /// CSS selector awaited after each navigation.
    pub ready_selector: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(DEFAULT_SETTLE_SECS),
            navigation_timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECS),
            chain_timeout: Duration::from_secs(DEFAULT_CHAIN_TIMEOUT_SECS),
            ready_selector: DEFAULT_READY_SELECTOR.to_string(),
        }
    }
}

/// States of a single resolution session.
#[derive(Debug, Clone)]
pub enum ResolutionState {
    /// About to load `target`.
    Navigating {
        /// Location to load next.
        target: String,
    },
    /// The browser reported `observed` after loading and settling.
    Observing {
        /// Location read back from the browser.
        observed: String,
    },
    /// Two consecutive observations matched.
    Stabilized(String),
    /// The chain ceiling elapsed; carries the last observation.
    TimedOut(String),
    /// A navigation step failed.
    Failed(ResolveError),
}

impl ResolutionState {
    fn label(&self) -> &'static str {
        match self {
            Self::Navigating { .. } => "navigating",
            Self::Observing { .. } => "observing",
            Self::Stabilized(_) => "stabilized",
            Self::TimedOut(_) => "timed_out",
            Self::Failed(_) => "failed",
        }
    }
}

/// How a successful resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Fixed point reached.
    Stabilized,
    /// Ceiling reached; the URL is a best effort.
    TimedOut,
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stabilized => f.write_str("stabilized"),
            Self::TimedOut => f.write_str("timed_out"),
        }
    }
}

/// Result of resolving one seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Seed the session started from.
    pub seed: String,
    /// Last observed location.
    pub final_url: String,
    /// Whether the chain converged or was cut off.
    pub outcome: ResolutionOutcome,
    /// Number of page loads performed.
    pub navigations: usize,
    /// Wall time spent in the session.
    pub elapsed: Duration,
}

impl Resolution {
    /// Returns true if the final URL was confirmed by two equal observations.
    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.outcome == ResolutionOutcome::Stabilized
    }
}

/// Follows HTTP, meta-refresh and script redirects through a browser.
///
/// Each call to [`resolve`](Self::resolve) launches its own session and tears
/// it down before returning.
pub struct RedirectResolver {
    launcher: Arc<dyn BrowserLauncher>,
    settings: ResolverSettings,
}

impl fmt::Debug for RedirectResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedirectResolver")
            .field("launcher", &self.launcher.name())
            .field("settings", &self.settings)
            .finish()
    }
}

impl RedirectResolver {
    /// Creates a resolver backed by `launcher`.
    #[must_use]
    pub fn new(launcher: Arc<dyn BrowserLauncher>, settings: ResolverSettings) -> Self {
        Self { launcher, settings }
    }

    /// Resolves `seed` to the location a browser finally displays.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` when the seed is blank, the browser cannot be
    /// launched, or any navigation step fails or times out. There is no retry.
    #[instrument(skip(self), fields(launcher = self.launcher.name()))]
    pub async fn resolve(&self, seed: &str) -> Result<Resolution, ResolveError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Err(ResolveError::EmptySeed);
        }

        let mut session = self.launcher.launch().await?;
        let result = self.follow_chain(session.as_mut(), seed).await;
        session.close().await;

        match &result {
            Ok(resolution) => info!(
                final_url = %resolution.final_url,
                outcome = %resolution.outcome,
                navigations = resolution.navigations,
                elapsed_ms = resolution.elapsed.as_millis(),
                "resolved"
            ),
            Err(error) => warn!(error = %error, "resolution failed"),
        }
        result
    }

    async fn follow_chain(
        &self,
        session: &mut dyn BrowserSession,
        seed: &str,
    ) -> Result<Resolution, ResolveError> {
        let started = Instant::now();
        let mut previous = String::new();
        let mut navigations = 0_usize;
        let mut state = ResolutionState::Navigating {
            target: seed.to_string(),
        };

        loop {
            debug!(state = state.label(), "resolution step");
            state = match state {
                ResolutionState::Navigating { target } => {
                    navigations += 1;
                    match self.observe(session, &target).await {
                        Ok(observed) => ResolutionState::Observing { observed },
                        Err(error) => ResolutionState::Failed(error),
                    }
                }
                ResolutionState::Observing { observed } => {
                    if observed == previous {
                        ResolutionState::Stabilized(observed)
                    } else if started.elapsed() > self.settings.chain_timeout {
                        ResolutionState::TimedOut(observed)
                    } else {
                        debug!(from = %previous, to = %observed, "location changed");
                        previous.clone_from(&observed);
                        ResolutionState::Navigating { target: observed }
                    }
                }
                ResolutionState::Stabilized(final_url) => {
                    return Ok(Resolution {
                        seed: seed.to_string(),
                        final_url,
                        outcome: ResolutionOutcome::Stabilized,
                        navigations,
                        elapsed: started.elapsed(),
                    });
                }
                ResolutionState::TimedOut(final_url) => {
                    warn!(
                        url = %final_url,
                        ceiling_secs = self.settings.chain_timeout.as_secs(),
                        "redirect loop timeout"
                    );
                    return Ok(Resolution {
                        seed: seed.to_string(),
                        final_url,
                        outcome: ResolutionOutcome::TimedOut,
                        navigations,
                        elapsed: started.elapsed(),
                    });
                }
                ResolutionState::Failed(error) => return Err(error),
            };
        }
    }

    /// Loads `target`, waits for readiness and settle time, and reads the location.
    async fn observe(
        &self,
        session: &mut dyn BrowserSession,
        target: &str,
    ) -> Result<String, ResolveError> {
        let step = async {
            session.navigate(target).await?;
            session.wait_ready(&self.settings.ready_selector).await?;
            tokio::time::sleep(self.settings.settle).await;
            session.current_location().await
        };

        tokio::time::timeout(self.settings.navigation_timeout, step)
            .await
            .map_err(|_| ResolveError::timeout(target, self.settings.navigation_timeout))?
    }
}
