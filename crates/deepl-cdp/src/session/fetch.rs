//! Request interception through the Fetch domain.

use serde_json::json;
use tracing::{debug, trace};

use crate::error::CdpError;
use crate::protocol::{ErrorReason, RequestPausedEvent, ResourceType};

use super::core::PageSession;

/// Decides whether a request of the given type is aborted.
pub type RequestFilter = fn(ResourceType) -> bool;

impl PageSession {
    /// Pause every request and abort those `filter` rejects.
    ///
    /// The pump task lives as long as the session. It can only be installed
    /// once per session since it takes the session's event stream.
    pub async fn enable_request_filter(&self, filter: RequestFilter) -> Result<(), CdpError> {
        let mut events = self
            .take_events()
            .ok_or_else(|| CdpError::InvalidResponse("Request filter already installed".to_string()))?;

        self.call(
            "Fetch.enable",
            Some(json!({
                "patterns": [{"urlPattern": "*", "requestStage": "Request"}],
            })),
        )
        .await?;

        let conn = self.conn.clone();
        let session_id = self.session_id.clone();

        let task = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if event.method.as_deref() != Some("Fetch.requestPaused") {
                    continue;
                }
                let Some(params) = event.params else { continue };
                let paused: RequestPausedEvent = match serde_json::from_value(params) {
                    Ok(paused) => paused,
                    Err(e) => {
                        debug!("Unreadable Fetch.requestPaused event: {}", e);
                        continue;
                    }
                };

                let (method, params) = if filter(paused.resource_type) {
                    trace!("Blocking {:?} {}", paused.resource_type, paused.request.url);
                    (
                        "Fetch.failRequest",
                        json!({
                            "requestId": paused.request_id,
                            "errorReason": ErrorReason::BlockedByClient,
                        }),
                    )
                } else {
                    (
                        "Fetch.continueRequest",
                        json!({"requestId": paused.request_id}),
                    )
                };

                if let Err(e) = conn.call(method, Some(params), Some(&session_id)).await {
                    // Requests belonging to a frame that navigated away are gone already.
                    debug!("{} failed: {}", method, e);
                    if matches!(e, CdpError::SessionClosed) {
                        break;
                    }
                }
            }
        });

        if let Some(previous) = self.filter_task.lock().replace(task) {
            previous.abort();
        }

        debug!("Request filter installed for session {}", self.session_id);
        Ok(())
    }
}
