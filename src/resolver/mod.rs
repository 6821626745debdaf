//! Redirect resolution for document-provider links.
//!
//! Provider links often reach the document through several hops: HTTP 3xx,
//! `<meta http-equiv="refresh">`, or script-driven navigation. Only a real
//! browser observes all three, so resolution drives one.
//!
//! # Architecture
//!
//! - [`BrowserLauncher`] / [`BrowserSession`] - narrow async seam over browser automation
//! - [`ChromeLauncher`] - headless Chromium implementation (one process per session)
//! - [`RedirectResolver`] - bounded state machine that navigates until the location stabilizes
//! - [`Resolution`] - final URL plus how the chain ended
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pdf_harvest_core::resolver::{ChromeLauncher, RedirectResolver, ResolverSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = RedirectResolver::new(
//!     Arc::new(ChromeLauncher::default()),
//!     ResolverSettings::default(),
//! );
//! let resolution = resolver.resolve("http://example.com/doc.pdf").await?;
//! println!("{} ({})", resolution.final_url, resolution.outcome);
//! # Ok(())
//! # }
//! ```

mod browser;
mod chrome;
mod error;
mod redirect;

pub use browser::{BrowserLauncher, BrowserSession};
pub use chrome::{ChromeLauncher, ChromeSettings, DEFAULT_LAUNCH_TIMEOUT_SECS};
pub use error::ResolveError;
pub use redirect::{
    DEFAULT_CHAIN_TIMEOUT_SECS, DEFAULT_NAVIGATION_TIMEOUT_SECS, DEFAULT_READY_SELECTOR,
    DEFAULT_SETTLE_SECS, RedirectResolver, Resolution, ResolutionOutcome, ResolutionState,
    ResolverSettings,
};
