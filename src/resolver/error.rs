//! Error types for redirect resolution.
//!
//! This module defines structured errors for the browser-driven resolver,
//! following the What/Why/Fix pattern used across the project.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while following a redirect chain.
///
/// All of them are terminal for the item being resolved.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The seed was blank.
    #[error("empty seed URL\n  Suggestion: Remove blank entries from the input list")]
    EmptySeed,

    /// The browser process or its first tab could not be started.
    #[error(
        "failed to launch browser: {reason}\n  Suggestion: Install Chromium/Chrome or set `chrome_path`"
    )]
    BrowserLaunch {
        /// Why the launch failed
        reason: String,
    },

    /// The browser reported an error while loading a page.
    #[error("navigation to '{url}' failed: {reason}")]
    Navigation {
        /// The URL being loaded
        url: String,
        /// Browser-reported failure
        reason: String,
    },

    /// A navigation step did not finish within the per-navigation timeout.
    #[error(
        "navigation to '{url}' timed out after {}s\n  Suggestion: Raise `navigation_timeout_secs` for slow hosts",
        .timeout.as_secs()
    )]
    Timeout {
        /// The URL being loaded
        url: String,
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// The browser did not report a location for the loaded page.
    #[error("browser reported no location after loading '{url}'")]
    LocationUnavailable {
        /// The URL that was loaded
        url: String,
    },
}

impl ResolveError {
    /// Creates a `BrowserLaunch` error.
    #[must_use]
    pub fn browser_launch(reason: impl Into<String>) -> Self {
        Self::BrowserLaunch {
            reason: reason.into(),
        }
    }

    /// Creates a `Navigation` error.
    #[must_use]
    pub fn navigation(url: &str, reason: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `Timeout` error.
    #[must_use]
    pub fn timeout(url: &str, timeout: Duration) -> Self {
        Self::Timeout {
            url: url.to_string(),
            timeout,
        }
    }

    /// Creates a `LocationUnavailable` error.
    #[must_use]
    pub fn location_unavailable(url: &str) -> Self {
        Self::LocationUnavailable {
            url: url.to_string(),
        }
    }
}
