//! Constants for the download module (timeouts, accepted content types).

/// Default whole-request timeout for document downloads (15 minutes).
pub const REQUEST_TIMEOUT_SECS: u64 = 15 * 60;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Content-type markers accepted as a document payload (matched as substrings,
/// case-insensitively). `octet-stream` covers both `binary/` and `application/`.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &["octet-stream", "application/pdf"];

/// Upper bound on the body buffer reserved up front from `Content-Length`.
///
/// Larger bodies still download; the buffer grows as chunks arrive.
pub const MAX_PREALLOCATED_BODY_BYTES: usize = 16 * 1024 * 1024;
