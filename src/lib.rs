//! PDF Harvest Core Library
//!
//! Resolves document-provider links (direct PDF links as well as redirecting,
//! login-gated endpoints) through a headless browser, then downloads and
//! stores the documents they finally point at.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`resolver`] - Browser-driven redirect resolution
//! - [`download`] - Validated, write-once document downloads
//! - [`batch`] - Sequential driver tying the two together
//! - [`seeds`] - Seed list parsing and the built-in provider list
//! - [`config`] - TOML file configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod config;
pub mod download;
pub mod resolver;
pub mod seeds;
mod user_agent;

// Re-export commonly used types
pub use batch::{BatchRunner, BatchStats, ItemOutcome, is_valid_final_url};
pub use config::{FileConfig, VerbositySetting};
pub use download::{
    DownloadError, DownloadOutcome, DownloadSettings, DownloadStatus, PdfDownloader,
    ensure_output_dir, sanitize_filename,
};
pub use resolver::{
    BrowserLauncher, BrowserSession, ChromeLauncher, ChromeSettings, RedirectResolver,
    Resolution, ResolutionOutcome, ResolveError, ResolverSettings,
};
pub use seeds::{SeedList, default_seed_list, parse_seed_list};
pub use user_agent::BROWSER_USER_AGENT;
