//! Navigation operations for CDP page session.

use std::time::{Duration, Instant};

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;

use super::core::PageSession;
use super::js::js_string;

impl PageSession {
    /// Navigate to URL and wait for the document to become interactive.
    pub async fn navigate(&self, url: &str) -> Result<String, CdpError> {
        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText") {
            return Err(CdpError::NavigationFailed(
                error.as_str().unwrap_or("Unknown error").to_string(),
            ));
        }

        let frame_id = result["frameId"]
            .as_str()
            .unwrap_or("main")
            .to_string();

        self.wait_for_load().await?;

        debug!("Navigated to {}", url);
        Ok(frame_id)
    }

    /// Wait for page load.
    pub async fn wait_for_load(&self) -> Result<(), CdpError> {
        let start = Instant::now();
        let timeout = self.default_timeout();

        loop {
            let result = self.evaluate("document.readyState").await?;

            if let Some(state) = result.as_str() {
                if state == "complete" || state == "interactive" {
                    return Ok(());
                }
            }

            if start.elapsed() > timeout {
                return Err(CdpError::Timeout("Page load timeout".to_string()));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Wait for selector to appear.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Option<Duration>,
    ) -> Result<(), CdpError> {
        let function = format!(
            "() => document.querySelector({}) !== null",
            js_string(selector)
        );
        self.wait_for_function(&function, timeout)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                CdpError::Timeout(_) => CdpError::Timeout(format!(
                    "Waiting for selector '{}' timed out",
                    selector
                )),
                other => other,
            })
    }
}
