//! Validated document downloads.
//!
//! This module fetches a resolved URL once, checks the response, and stores
//! the payload under a deterministic name in a flat output directory.
//!
//! # Features
//!
//! - Skip-if-exists by sanitized filename (case-insensitive), no request made
//! - Only `200 OK` with a PDF or octet-stream content type is accepted
//! - Whole body buffered before anything touches disk, so a failed transfer
//!   never leaves a partial file
//! - Create-new file semantics: an existing file is never overwritten
//!
//! # Example
//!
//! ```no_run
//! use pdf_harvest_core::download::{DownloadSettings, PdfDownloader, ensure_output_dir};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let output_dir = Path::new("PDFs");
//! ensure_output_dir(output_dir).await?;
//! let downloader = PdfDownloader::new(DownloadSettings::default())?;
//! let outcome = downloader
//!     .download("http://example.com/doc.PDF", output_dir)
//!     .await?;
//! println!("{}", outcome.path().display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;
mod outcome;
mod storage;

pub use client::{DownloadSettings, PdfDownloader, is_document_content_type};
pub use constants::{
    ACCEPTED_CONTENT_TYPES, CONNECT_TIMEOUT_SECS, MAX_PREALLOCATED_BODY_BYTES,
    REQUEST_TIMEOUT_SECS,
};
pub use error::DownloadError;
pub use filename::sanitize_filename;
pub use outcome::{DownloadOutcome, DownloadStatus};
pub use storage::{ensure_output_dir, find_existing, write_new_file};
