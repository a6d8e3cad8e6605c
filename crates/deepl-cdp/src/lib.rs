//! Chrome DevTools Protocol (CDP) client for driving a headless browser.
//!
//! Every [`Browser`] owns one browser process with its own throwaway profile
//! and a WebSocket connection to it. Nothing is shared between instances, so
//! concurrent callers each launch their own.
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │     Browser     │ ◄──────────────► │ Chromium process │
//! │   PageSession   │       CDP        │  (temp profile)  │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let browser = Browser::launch(&LaunchOptions::default()).await?;
//! let page = browser.new_page().await?;
//! page.navigate("https://example.com").await?;
//! let title = page.evaluate("document.title").await?;
//! browser.close().await?;
//! ```

mod browser;
mod client;
mod connection;
mod error;
mod install;
mod launch;
mod protocol;
mod session;

pub use browser::Browser;
pub use client::CdpClient;
pub use error::{BrowserError, CdpError};
pub use install::install_browser;
pub use launch::LaunchOptions;
pub use protocol::*;
pub use session::{PageSession, RequestFilter};
