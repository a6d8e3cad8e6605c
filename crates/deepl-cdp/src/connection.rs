//! Shared command channel over the browser WebSocket.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::SplitSink;
use futures::SinkExt;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::trace;

use crate::error::CdpError;
use crate::protocol::CdpRequest;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub(crate) type WsSink = SplitSink<WsStream, Message>;

/// Pending request waiting for response.
pub(crate) struct PendingRequest {
    pub tx: oneshot::Sender<Result<Value, CdpError>>,
}

pub(crate) type PendingMap = Arc<Mutex<HashMap<u64, PendingRequest>>>;

/// Clonable handle for sending commands. The client and every page session
/// share one, so request ids stay unique across the whole connection.
#[derive(Clone)]
pub(crate) struct Connection {
    ws_tx: Arc<tokio::sync::Mutex<WsSink>>,
    pending: PendingMap,
    request_id: Arc<AtomicU64>,
    command_timeout: Duration,
}

impl Connection {
    pub(crate) fn new(ws_tx: WsSink, pending: PendingMap, command_timeout: Duration) -> Self {
        Self {
            ws_tx: Arc::new(tokio::sync::Mutex::new(ws_tx)),
            pending,
            request_id: Arc::new(AtomicU64::new(1)),
            command_timeout,
        }
    }

    /// Send a CDP command and wait for its response.
    pub(crate) async fn call(
        &self,
        method: &str,
        params: Option<Value>,
        session_id: Option<&str>,
    ) -> Result<Value, CdpError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(|s| s.to_string()),
        };

        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, PendingRequest { tx });

        {
            let mut ws = self.ws_tx.lock().await;
            if let Err(e) = ws.send(Message::Text(json.into())).await {
                self.pending.lock().remove(&id);
                return Err(CdpError::WebSocket(e.to_string()));
            }
        }

        match tokio::time::timeout(self.command_timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(CdpError::SessionClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                Err(CdpError::Timeout(format!("Request {} timed out", method)))
            }
        }
    }

    /// Fail every in-flight request. Called when the socket goes away.
    pub(crate) fn fail_pending(pending: &PendingMap) {
        let drained: Vec<PendingRequest> = pending.lock().drain().map(|(_, req)| req).collect();
        for req in drained {
            let _ = req.tx.send(Err(CdpError::SessionClosed));
        }
    }
}
