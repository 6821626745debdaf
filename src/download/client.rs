//! Validated single-shot document downloader.
//!
//! This module provides [`PdfDownloader`], which fetches one resolved URL,
//! checks that the response really is a document, and stores it exactly once.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{
    ACCEPTED_CONTENT_TYPES, CONNECT_TIMEOUT_SECS, MAX_PREALLOCATED_BODY_BYTES,
    REQUEST_TIMEOUT_SECS,
};
use super::error::DownloadError;
use super::filename::sanitize_filename;
use super::outcome::DownloadOutcome;
use super::storage::{find_existing, write_new_file};
use crate::user_agent;

/// Tunables for [`PdfDownloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSettings {
    /// Whole-request timeout, body included.
    pub request_timeout: Duration,
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            user_agent: user_agent::default_user_agent(),
        }
    }
}

/// HTTP downloader that writes only validated, non-empty documents.
///
/// Create it once and reuse it for the whole batch; the inner client pools
/// connections.
///
/// # Example
///
/// ```no_run
/// use pdf_harvest_core::download::{DownloadSettings, PdfDownloader};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = PdfDownloader::new(DownloadSettings::default())?;
/// let outcome = downloader
///     .download("https://example.com/paper.pdf", Path::new("./PDFs"))
///     .await?;
/// println!("{}", outcome.path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PdfDownloader {
    client: Client,
}

impl PdfDownloader {
    /// Builds the downloader's HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend cannot be initialized.
    pub fn new(settings: DownloadSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .gzip(true)
            .user_agent(settings.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Downloads `url` into `output_dir` under its sanitized filename.
    ///
    /// Returns [`DownloadOutcome::Skipped`] without touching the network when
    /// a file of the same name (ignoring case) already exists.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - the URL is invalid or the request fails (network error, timeout)
    /// - the server answers anything other than `200 OK`
    /// - the content type is neither PDF nor octet-stream
    /// - the body is empty
    /// - the destination cannot be created or written
    #[instrument(skip(self, output_dir), fields(url = %url))]
    pub async fn download(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let filename = sanitize_filename(url);
        let destination = output_dir.join(&filename);
        debug!(path = %destination.display(), "resolved output path");

        if let Some(existing) = find_existing(output_dir, &filename).await? {
            info!(path = %existing.display(), "file already exists, skipping");
            return Ok(DownloadOutcome::Skipped { path: existing });
        }

        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::from_transport(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        if !is_document_content_type(content_type.as_deref()) {
            return Err(DownloadError::unexpected_content_type(
                url,
                content_type.as_deref(),
            ));
        }

        let body = read_body(response, url).await?;
        if body.is_empty() {
            return Err(DownloadError::empty_body(url));
        }

        write_new_file(&destination, &body).await?;

        let bytes = body.len() as u64;
        info!(bytes, path = %destination.display(), "download complete");
        Ok(DownloadOutcome::Saved {
            path: destination,
            bytes,
        })
    }
}

/// Returns true when the declared content type is a PDF or generic binary payload.
#[must_use]
pub fn is_document_content_type(content_type: Option<&str>) -> bool {
    let Some(content_type) = content_type else {
        return false;
    };
    let lower = content_type.to_ascii_lowercase();
    ACCEPTED_CONTENT_TYPES
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Buffers the whole response body; nothing is written until it is complete.
async fn read_body(response: reqwest::Response, url: &str) -> Result<Vec<u8>, DownloadError> {
    let mut buffer = Vec::with_capacity(initial_capacity(response.content_length()));
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| DownloadError::from_transport(url, e))?;
        buffer.extend_from_slice(&chunk);
    }

    debug!(bytes = buffer.len(), "response body buffered");
    Ok(buffer)
}

/// Buffer size to reserve for a declared body length.
///
/// `Content-Length` comes from the server and is only a hint.
fn initial_capacity(declared: Option<u64>) -> usize {
    declared
        .and_then(|len| usize::try_from(len).ok())
        .map_or(0, |len| len.min(MAX_PREALLOCATED_BODY_BYTES))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    fn pdf_response(body: &[u8]) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("Content-Type", "application/pdf")
            .set_body_bytes(body.to_vec())
    }

    fn quick_downloader() -> PdfDownloader {
        PdfDownloader::new(DownloadSettings {
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            ..DownloadSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_is_document_content_type() {
        assert!(is_document_content_type(Some("application/pdf")));
        assert!(is_document_content_type(Some("Application/PDF; charset=binary")));
        assert!(is_document_content_type(Some("binary/octet-stream")));
        assert!(is_document_content_type(Some("application/octet-stream")));
        assert!(!is_document_content_type(Some("text/html; charset=utf-8")));
        assert!(!is_document_content_type(Some("application/json")));
        assert!(!is_document_content_type(None));
    }

    #[test]
    fn test_initial_capacity_is_capped() {
        assert_eq!(initial_capacity(None), 0);
        assert_eq!(initial_capacity(Some(1024)), 1024);
        assert_eq!(
            initial_capacity(Some(35_184_372_088_832)),
            MAX_PREALLOCATED_BODY_BYTES
        );
        assert_eq!(initial_capacity(Some(u64::MAX)), MAX_PREALLOCATED_BODY_BYTES);
    }

    #[test]
    fn test_default_settings() {
        let settings = DownloadSettings::default();
        assert_eq!(settings.request_timeout, Duration::from_secs(900));
        assert!(settings.user_agent.contains("Mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_download_writes_pdf() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/files/Report.pdf"))
            .respond_with(pdf_response(b"%PDF-1.7 body"))
            .mount(&server)
            .await;

        let url = format!("{}/files/Report.pdf", server.uri());
        let outcome = quick_downloader().download(&url, temp.path()).await.unwrap();

        let expected = temp.path().join("report.pdf");
        assert_eq!(
            outcome,
            DownloadOutcome::Saved {
                path: expected.clone(),
                bytes: 13
            }
        );
        assert_eq!(std::fs::read(expected).unwrap(), b"%PDF-1.7 body");
    }

    #[tokio::test]
    async fn test_download_accepts_octet_stream() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/blob"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "binary/octet-stream")
                    .set_body_bytes(b"bytes".to_vec()),
            )
            .mount(&server)
            .await;

        let url = format!("{}/blob", server.uri());
        let outcome = quick_downloader().download(&url, temp.path()).await.unwrap();
        assert_eq!(outcome.path(), &temp.path().join("blob.pdf"));
    }

    #[tokio::test]
    async fn test_download_rejects_html_even_with_pdf_extension() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/paper.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "text/html; charset=utf-8")
                    .set_body_string("<html>Please sign in</html>"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/paper.pdf", server.uri());
        let err = quick_downloader()
            .download(&url, temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::UnexpectedContentType { .. }));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_rejects_missing_content_type() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/untyped.pdf"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/untyped.pdf", server.uri());
        let err = quick_downloader()
            .download(&url, temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::UnexpectedContentType { .. }));
    }

    #[tokio::test]
    async fn test_download_non_200_is_status_error() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        let cases = [
            ("/gone.pdf", 404_u16),
            ("/broken.pdf", 500),
            ("/partial.pdf", 206),
        ];
        for (route, status) in cases {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(
                    ResponseTemplate::new(status)
                        .insert_header("Content-Type", "application/pdf")
                        .set_body_bytes(b"x".to_vec()),
                )
                .mount(&server)
                .await;

            let url = format!("{}{route}", server.uri());
            let err = quick_downloader()
                .download(&url, temp.path())
                .await
                .unwrap_err();
            match err {
                DownloadError::HttpStatus { status: got, .. } => assert_eq!(got, status),
                other => panic!("expected HttpStatus {status}, got {other:?}"),
            }
        }
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_empty_body_creates_no_file() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/empty.pdf"))
            .respond_with(pdf_response(b""))
            .mount(&server)
            .await;

        let url = format!("{}/empty.pdf", server.uri());
        let err = quick_downloader()
            .download(&url, temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::EmptyBody { .. }));
        assert!(!temp.path().join("empty.pdf").exists());
    }

    #[tokio::test]
    async fn test_download_skips_existing_without_request() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .respond_with(pdf_response(b"new"))
            .expect(0)
            .mount(&server)
            .await;
        std::fs::write(temp.path().join("DOC.PDF"), b"old").unwrap();

        let url = format!("{}/doc.pdf", server.uri());
        let outcome = quick_downloader().download(&url, temp.path()).await.unwrap();

        assert_eq!(
            outcome,
            DownloadOutcome::Skipped {
                path: temp.path().join("DOC.PDF")
            }
        );
        assert_eq!(std::fs::read(temp.path().join("DOC.PDF")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_download_timeout_leaves_no_file() {
        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/slow.pdf"))
            .respond_with(pdf_response(b"data").set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let downloader = PdfDownloader::new(DownloadSettings {
            request_timeout: Duration::from_millis(300),
            ..DownloadSettings::default()
        })
        .unwrap();
        let url = format!("{}/slow.pdf", server.uri());
        let err = downloader.download(&url, temp.path()).await.unwrap_err();

        assert!(
            matches!(err, DownloadError::Timeout { .. } | DownloadError::Network { .. }),
            "expected timeout, got {err:?}"
        );
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_download_invalid_url() {
        let temp = TempDir::new().unwrap();
        let err = quick_downloader()
            .download("not a url", temp.path())
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_download_sends_browser_user_agent() {
        /// Matches requests whose User-Agent looks like a desktop browser.
        struct BrowserUaMatcher;

        impl Match for BrowserUaMatcher {
            fn matches(&self, request: &Request) -> bool {
                request
                    .headers
                    .get("User-Agent")
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|ua| ua.starts_with("Mozilla/5.0") && ua.contains("Chrome"))
            }
        }

        let server = MockServer::start().await;
        let temp = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/ua.pdf"))
            .and(BrowserUaMatcher)
            .respond_with(pdf_response(b"ok"))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ua.pdf"))
            .respond_with(ResponseTemplate::new(403))
            .with_priority(u8::MAX)
            .mount(&server)
            .await;

        let url = format!("{}/ua.pdf", server.uri());
        let outcome = quick_downloader().download(&url, temp.path()).await;
        assert!(outcome.is_ok(), "expected browser UA to be accepted: {outcome:?}");
    }
}
