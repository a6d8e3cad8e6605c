//! Element interaction for CDP page session.

use serde_json::json;
use tracing::debug;

use crate::error::CdpError;

use super::core::PageSession;
use super::js::js_string;

impl PageSession {
    /// Dispatch a DOM `click` event on the first element matching `selector`.
    ///
    /// Waits for the element first. No pointer events are synthesized, so
    /// overlays covering the element do not intercept the click.
    pub async fn dispatch_click(&self, selector: &str) -> Result<(), CdpError> {
        self.wait_for_selector(selector, None).await?;

        let expression = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.dispatchEvent(new MouseEvent('click', {{ bubbles: true, cancelable: true, composed: true }}));
                return true;
            }})()"#,
            js_string(selector)
        );

        let clicked = self.evaluate(&expression).await?;
        if clicked.as_bool() != Some(true) {
            return Err(CdpError::ElementNotFound(selector.to_string()));
        }

        debug!("Clicked {}", selector);
        Ok(())
    }

    /// Replace the content of an input or contenteditable element with `text`.
    pub async fn fill(&self, selector: &str, text: &str) -> Result<(), CdpError> {
        self.wait_for_selector(selector, None).await?;

        let expression = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.focus();
                if ('value' in el && typeof el.select === 'function') {{
                    el.select();
                }} else {{
                    document.execCommand('selectAll', false, null);
                }}
                return true;
            }})()"#,
            js_string(selector)
        );

        let focused = self.evaluate(&expression).await?;
        if focused.as_bool() != Some(true) {
            return Err(CdpError::ElementNotFound(selector.to_string()));
        }

        self.insert_text(text).await
    }

    /// Type text into the focused element.
    pub async fn insert_text(&self, text: &str) -> Result<(), CdpError> {
        self.call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("Typed {} characters", text.chars().count());
        Ok(())
    }
}
