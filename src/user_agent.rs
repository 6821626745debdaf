//! Shared User-Agent string for document requests.
//!
//! Document hosts commonly reject clients that do not look like a desktop
//! browser, so downloads present a current Chrome identity.

/// Desktop Chrome User-Agent sent with download requests.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Default User-Agent for download requests.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}
