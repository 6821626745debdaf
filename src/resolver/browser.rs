//! Narrow browser-automation seam used by the redirect resolver.

use async_trait::async_trait;

use super::ResolveError;

/// Starts disposable browser sessions.
///
/// Every call must return a fresh, isolated session: no cookies, cache or
/// storage may leak from one resolution into the next.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Launches a new isolated session.
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, ResolveError>;
}

/// One live browser tab.
#[async_trait]
pub trait BrowserSession: Send {
    /// Loads `url` in the tab.
    async fn navigate(&mut self, url: &str) -> Result<(), ResolveError>;

    /// Waits until an element matching `selector` is present in the page.
    async fn wait_ready(&mut self, selector: &str) -> Result<(), ResolveError>;

    /// Returns the location the tab currently displays.
    async fn current_location(&mut self) -> Result<String, ResolveError>;

    /// Tears the session down. Failures are logged, not returned.
    async fn close(self: Box<Self>);
}
