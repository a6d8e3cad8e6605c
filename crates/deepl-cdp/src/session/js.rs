//! JavaScript execution operations for CDP page session.

use std::time::{Duration, Instant};

use serde_json::{json, Value};
use tracing::trace;

use crate::error::CdpError;
use crate::protocol::ExceptionDetails;

use super::core::PageSession;

/// Interval between predicate evaluations in [`PageSession::wait_for_function`].
const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl PageSession {
    /// Evaluate JavaScript expression and return its value.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let message = serde_json::from_value::<ExceptionDetails>(exception.clone())
                .map(|d| d.message())
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CdpError::JavaScript(message));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Poll a JavaScript function until it returns a truthy value.
    ///
    /// `function` is the source of a zero-argument function, e.g.
    /// `() => document.querySelector('main') !== null`. Script errors while
    /// polling count as "not yet" and are reported if the wait times out.
    pub async fn wait_for_function(
        &self,
        function: &str,
        timeout: Option<Duration>,
    ) -> Result<Value, CdpError> {
        let timeout = timeout.unwrap_or_else(|| self.default_timeout());
        let expression = format!("({})()", function);
        let start = Instant::now();
        let mut last_error = None;

        loop {
            match self.evaluate(&expression).await {
                Ok(value) if is_truthy(&value) => return Ok(value),
                Ok(_) => {}
                Err(CdpError::JavaScript(message)) => {
                    trace!("wait_for_function: {}", message);
                    last_error = Some(message);
                }
                Err(e) => return Err(e),
            }

            if start.elapsed() > timeout {
                let detail = last_error
                    .map(|e| format!(" (last error: {})", e))
                    .unwrap_or_default();
                return Err(CdpError::Timeout(format!(
                    "Waiting for function timed out after {} ms{}",
                    timeout.as_millis(),
                    detail
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// JavaScript truthiness of a by-value result.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Quote a Rust string as a JavaScript string literal.
pub(crate) fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}
