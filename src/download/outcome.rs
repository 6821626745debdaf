//! Terminal results of a single download attempt.

use std::fmt;
use std::path::PathBuf;

use super::error::DownloadError;

/// Non-error result of a download attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// A new file was written.
    Saved {
        /// Path of the written file.
        path: PathBuf,
        /// Number of bytes transferred and written.
        bytes: u64,
    },
    /// A file with the same (case-insensitive) name already existed; nothing was fetched.
    Skipped {
        /// Path of the existing file.
        path: PathBuf,
    },
}

impl DownloadOutcome {
    /// Returns true only when a new file was written.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// Path of the written or pre-existing file.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Saved { path, .. } | Self::Skipped { path } => path,
        }
    }
}

/// Flat status taxonomy for logging and batch tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadStatus {
    /// Destination already existed.
    SkippedExists,
    /// Invalid URL or transport-level failure.
    FailedRequest,
    /// Non-200 response.
    FailedStatus,
    /// Declared content type was not a document.
    FailedContentType,
    /// Zero bytes transferred.
    FailedEmpty,
    /// Local filesystem failure.
    FailedWrite,
    /// File written.
    Succeeded,
}

impl DownloadStatus {
    /// Stable label used in log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SkippedExists => "skipped_exists",
            Self::FailedRequest => "failed_request",
            Self::FailedStatus => "failed_status",
            Self::FailedContentType => "failed_content_type",
            Self::FailedEmpty => "failed_empty",
            Self::FailedWrite => "failed_write",
            Self::Succeeded => "succeeded",
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&DownloadOutcome> for DownloadStatus {
    fn from(outcome: &DownloadOutcome) -> Self {
        match outcome {
            DownloadOutcome::Saved { .. } => Self::Succeeded,
            DownloadOutcome::Skipped { .. } => Self::SkippedExists,
        }
    }
}

impl From<&DownloadError> for DownloadStatus {
    fn from(error: &DownloadError) -> Self {
        match error {
            DownloadError::InvalidUrl { .. }
            | DownloadError::Network { .. }
            | DownloadError::Timeout { .. } => Self::FailedRequest,
            DownloadError::HttpStatus { .. } => Self::FailedStatus,
            DownloadError::UnexpectedContentType { .. } => Self::FailedContentType,
            DownloadError::EmptyBody { .. } => Self::FailedEmpty,
            DownloadError::FileCreate { .. }
            | DownloadError::Write { .. }
            | DownloadError::OutputDir { .. } => Self::FailedWrite,
        }
    }
}

impl From<&Result<DownloadOutcome, DownloadError>> for DownloadStatus {
    fn from(result: &Result<DownloadOutcome, DownloadError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(error) => error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_outcome() {
        let saved = DownloadOutcome::Saved {
            path: PathBuf::from("a.pdf"),
            bytes: 3,
        };
        let skipped = DownloadOutcome::Skipped {
            path: PathBuf::from("a.pdf"),
        };
        assert_eq!(DownloadStatus::from(&saved), DownloadStatus::Succeeded);
        assert_eq!(DownloadStatus::from(&skipped), DownloadStatus::SkippedExists);
        assert!(saved.is_saved());
        assert!(!skipped.is_saved());
    }

    #[test]
    fn test_status_from_error() {
        let cases = [
            (DownloadError::timeout("u"), DownloadStatus::FailedRequest),
            (DownloadError::invalid_url("u"), DownloadStatus::FailedRequest),
            (DownloadError::http_status("u", 503), DownloadStatus::FailedStatus),
            (
                DownloadError::unexpected_content_type("u", Some("text/html")),
                DownloadStatus::FailedContentType,
            ),
            (DownloadError::empty_body("u"), DownloadStatus::FailedEmpty),
            (
                DownloadError::write("a.pdf", std::io::Error::other("disk full")),
                DownloadStatus::FailedWrite,
            ),
        ];
        for (error, expected) in &cases {
            assert_eq!(DownloadStatus::from(error), *expected, "{error}");
        }
    }

    #[test]
    fn test_status_labels_are_distinct() {
        let all = [
            DownloadStatus::SkippedExists,
            DownloadStatus::FailedRequest,
            DownloadStatus::FailedStatus,
            DownloadStatus::FailedContentType,
            DownloadStatus::FailedEmpty,
            DownloadStatus::FailedWrite,
            DownloadStatus::Succeeded,
        ];
        let labels: std::collections::HashSet<_> = all.iter().map(|s| s.as_str()).collect();
        assert_eq!(labels.len(), all.len());
    }
}
