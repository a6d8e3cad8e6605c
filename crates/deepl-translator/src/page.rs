//! The page operations the translation workflow needs.

use std::time::Duration;

use async_trait::async_trait;
use deepl_cdp::{CdpError, PageSession};
use serde_json::Value;

/// A loaded browser page, as seen by the workflow.
///
/// Implemented by [`PageSession`]. Tests substitute a scripted page.
#[async_trait]
pub trait TranslatorPage: Send + Sync {
    /// Navigate and wait until the document is interactive.
    async fn goto(&self, url: &str) -> Result<(), CdpError>;

    /// Poll a zero-argument JS function until it returns a truthy value.
    /// `None` uses the page's default timeout.
    async fn wait_for_function(
        &self,
        function: &str,
        timeout: Option<Duration>,
    ) -> Result<(), CdpError>;

    /// Evaluate an expression and return its value.
    async fn evaluate(&self, expression: &str) -> Result<Value, CdpError>;

    /// Dispatch a click on the first element matching `selector`.
    async fn click(&self, selector: &str) -> Result<(), CdpError>;

    /// Replace the content of the element matching `selector` with `text`.
    async fn fill(&self, selector: &str, text: &str) -> Result<(), CdpError>;
}

#[async_trait]
impl TranslatorPage for PageSession {
    async fn goto(&self, url: &str) -> Result<(), CdpError> {
        self.navigate(url).await.map(|_| ())
    }

    async fn wait_for_function(
        &self,
        function: &str,
        timeout: Option<Duration>,
    ) -> Result<(), CdpError> {
        PageSession::wait_for_function(self, function, timeout)
            .await
            .map(|_| ())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        PageSession::evaluate(self, expression).await
    }

    async fn click(&self, selector: &str) -> Result<(), CdpError> {
        self.dispatch_click(selector).await
    }

    async fn fill(&self, selector: &str, text: &str) -> Result<(), CdpError> {
        PageSession::fill(self, selector, text).await
    }
}
