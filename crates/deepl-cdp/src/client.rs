//! CDP WebSocket client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::SplitStream;
use futures::StreamExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::{mpsc, RwLock};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};

use crate::connection::{Connection, PendingMap, WsStream};
use crate::error::CdpError;
use crate::protocol::{BrowserVersion, CdpResponse};
use crate::session::PageSession;

type WsSource = SplitStream<WsStream>;
type EventHandlers = Arc<RwLock<HashMap<String, mpsc::UnboundedSender<CdpResponse>>>>;

/// CDP client for browser automation.
///
/// Connects to the browser-level WebSocket and hands out page sessions that
/// multiplex over it.
pub struct CdpClient {
    /// Browser product string, e.g. `HeadlessChrome/120.0.6099.109`.
    product: String,
    conn: Connection,
    /// Event channels by session ID.
    event_handlers: EventHandlers,
    /// Background task handle.
    recv_task: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to the browser at the given HTTP endpoint.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - DevTools endpoint (e.g., "http://127.0.0.1:9222")
    /// * `command_timeout` - upper bound for a single command round trip
    pub async fn connect(endpoint: &str, command_timeout: Duration) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();

        // Get browser version info to find WebSocket URL
        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::BrowserNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::BrowserNotAvailable(format!("{}: {}", endpoint, e)))?;

        let browser_ws_url = version.web_socket_debugger_url;

        let (ws_stream, _) = tokio_tungstenite::connect_async(&browser_ws_url)
            .await
            .map_err(|e| CdpError::ConnectionFailed(format!("WebSocket: {}", e)))?;

        let (ws_sink, ws_source) = ws_stream.split();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let event_handlers: EventHandlers = Arc::new(RwLock::new(HashMap::new()));

        let recv_task = {
            let pending = pending.clone();
            let event_handlers = event_handlers.clone();
            tokio::spawn(async move {
                Self::receive_loop(ws_source, pending.clone(), event_handlers).await;
                Connection::fail_pending(&pending);
            })
        };

        debug!("CDP client connected to {} ({})", browser_ws_url, version.browser);

        Ok(Self {
            product: version.browser,
            conn: Connection::new(ws_sink, pending, command_timeout),
            event_handlers,
            recv_task,
        })
    }

    /// WebSocket receive loop.
    async fn receive_loop(mut ws_source: WsSource, pending: PendingMap, event_handlers: EventHandlers) {
        while let Some(msg) = ws_source.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    match serde_json::from_str::<CdpResponse>(&text) {
                        Ok(resp) => Self::dispatch(resp, &pending, &event_handlers).await,
                        Err(e) => {
                            warn!("Failed to parse CDP message: {}", e);
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!("WebSocket closed");
                    break;
                }
                Err(e) => {
                    debug!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    }

    /// Route a message to the waiting request or to its session's event channel.
    async fn dispatch(resp: CdpResponse, pending: &PendingMap, event_handlers: &EventHandlers) {
        if let Some(id) = resp.id {
            let pending_req = pending.lock().remove(&id);
            if let Some(req) = pending_req {
                let result = if let Some(error) = resp.error {
                    Err(CdpError::Protocol {
                        code: error.code,
                        message: error.message,
                    })
                } else {
                    Ok(resp.result.unwrap_or(Value::Null))
                };
                let _ = req.tx.send(result);
            }
        } else if resp.method.is_some() {
            let session_id = resp.session_id.clone().unwrap_or_default();
            let handlers = event_handlers.read().await;
            if let Some(tx) = handlers.get(&session_id) {
                let _ = tx.send(resp);
            }
        }
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.conn.call(method, params, None).await
    }

    /// Browser product string.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Create a new blank page and attach a session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        let result = self
            .call("Target.createTarget", Some(json!({"url": "about:blank"})))
            .await?;

        let target_id = result["targetId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing targetId".to_string()))?
            .to_string();

        let result = self
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.event_handlers
            .write()
            .await
            .insert(session_id.clone(), event_tx);

        debug!("Created page {} (session {})", target_id, session_id);

        let session = PageSession::new(target_id, session_id, self.conn.clone(), event_rx);
        session.enable_domains().await?;

        Ok(session)
    }

    /// Ask the browser to exit.
    pub async fn close_browser(&self) -> Result<(), CdpError> {
        match self.call("Browser.close", None).await {
            // The socket can drop before the reply arrives.
            Ok(_) | Err(CdpError::SessionClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.recv_task.abort();
    }
}
