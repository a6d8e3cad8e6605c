//! CDP and browser errors.

use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to the browser.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// DevTools endpoint did not answer.
    #[error("Browser not available at {0}")]
    BrowserNotAvailable(String),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// CDP protocol error.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Navigation failed.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Element not found.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// JavaScript execution error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// Timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Session closed.
    #[error("Session closed")]
    SessionClosed,

    /// Invalid response.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Browser process errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Browser executable not found. Install Chromium or set browser.executable.")]
    ChromeNotFound,

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Browser install failed: {0}")]
    InstallFailed(String),

    #[error(transparent)]
    Cdp(#[from] CdpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdp_error_display() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "Cannot navigate".to_string(),
        };
        assert_eq!(err.to_string(), "CDP error: Cannot navigate (code: -32000)");
        assert_eq!(CdpError::SessionClosed.to_string(), "Session closed");
    }

    #[test]
    fn test_browser_error_display() {
        let err = BrowserError::LaunchFailed("permission denied".to_string());
        assert_eq!(err.to_string(), "Failed to launch browser: permission denied");

        let err = BrowserError::from(CdpError::Timeout("Request Page.navigate timed out".to_string()));
        assert_eq!(err.to_string(), "Timeout: Request Page.navigate timed out");

        assert!(BrowserError::ChromeNotFound.to_string().contains("not found"));
    }
}
