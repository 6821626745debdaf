//! Deterministic filename derivation for downloaded documents.
//!
//! The destination name is a pure function of the URL so that re-running a
//! batch maps every source onto the same file and finds it already present.

use std::sync::LazyLock;

use regex::Regex;

/// Runs of characters that are not lowercase ASCII alphanumerics.
#[allow(clippy::expect_used)]
static NON_ALNUM_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("non-alnum regex is valid") // Static pattern, safe to panic
});

/// Token stripped from the sanitized stem (a flattened `.pdf` extension).
const FLATTENED_EXTENSION: &str = "_pdf";

/// Suffix every stored document carries.
const PDF_SUFFIX: &str = ".pdf";

/// Converts a URL into a filesystem-safe `.pdf` filename.
///
/// Steps, in order:
/// 1. lowercase the whole URL
/// 2. keep the last path segment (query string included, trailing `/` ignored)
/// 3. replace every run of non-`[a-z0-9]` characters with one `_`
/// 4. trim leading and trailing `_`
/// 5. remove every `_pdf` token
/// 6. append `.pdf` unless already present
///
/// Never fails: degenerate input yields `.pdf`.
///
/// # Example
///
/// ```
/// use pdf_harvest_core::download::sanitize_filename;
///
/// assert_eq!(sanitize_filename("http://example.com/doc.PDF"), "doc.pdf");
/// ```
#[must_use]
pub fn sanitize_filename(url: &str) -> String {
    let lower = url.to_lowercase();
    let base = last_segment(&lower);

    let replaced = NON_ALNUM_RUN.replace_all(base, "_");
    let stem = replaced.trim_matches('_').replace(FLATTENED_EXTENSION, "");

    if stem.ends_with(PDF_SUFFIX) {
        stem
    } else {
        format!("{stem}{PDF_SUFFIX}")
    }
}

fn last_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or_default()
}
