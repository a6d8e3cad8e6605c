//! Core session struct and CDP command dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::connection::Connection;
use crate::error::CdpError;
use crate::protocol::CdpResponse;

/// Default bound for page-level waits until [`PageSession::set_default_timeout`] is called.
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// A session attached to a single page/target.
pub struct PageSession {
    /// Target ID.
    pub(super) target_id: String,
    /// Session ID for this target.
    pub(super) session_id: String,
    /// Command channel (shared with client).
    pub(super) conn: Connection,
    /// Event receiver, taken by the first consumer.
    pub(super) events: Mutex<Option<mpsc::UnboundedReceiver<CdpResponse>>>,
    /// Bound for every wait on this page, in milliseconds.
    pub(super) default_timeout_ms: AtomicU64,
    /// Request interception pump, if installed.
    pub(super) filter_task: Mutex<Option<JoinHandle<()>>>,
}

impl PageSession {
    /// Create a new page session.
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        conn: Connection,
        event_rx: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            conn,
            events: Mutex::new(Some(event_rx)),
            default_timeout_ms: AtomicU64::new(DEFAULT_TIMEOUT_MS),
            filter_task: Mutex::new(None),
        }
    }

    /// Get target ID.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Get session ID.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Bound every subsequent wait on this page.
    pub fn set_default_timeout(&self, timeout: Duration) {
        self.default_timeout_ms
            .store(timeout.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms.load(Ordering::SeqCst))
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.conn.call(method, params, Some(&self.session_id)).await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Take the event stream. Only one consumer gets it.
    pub(super) fn take_events(&self) -> Option<mpsc::UnboundedReceiver<CdpResponse>> {
        self.events.lock().take()
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        if let Some(task) = self.filter_task.lock().take() {
            task.abort();
        }
    }
}
