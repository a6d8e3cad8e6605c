//! Browser launch configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::default_true;

/// Browser launch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Explicit browser executable. Searched for when unset.
    #[serde(default)]
    pub executable: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// How long to wait for the DevTools endpoint after spawning.
    #[serde(default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,

    #[serde(default = "default_window_width")]
    pub window_width: u32,

    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Additional command-line switches passed to the browser.
    #[serde(default)]
    pub extra_args: Vec<String>,

    /// Run `install_command` once when no executable can be found.
    #[serde(default = "default_true")]
    pub auto_install: bool,

    #[serde(default = "default_install_command")]
    pub install_command: Vec<String>,
}

fn default_launch_timeout_ms() -> u64 {
    20000
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

fn default_install_command() -> Vec<String> {
    ["npx", "--yes", "playwright", "install", "chromium"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: default_true(),
            launch_timeout_ms: default_launch_timeout_ms(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            extra_args: Vec::new(),
            auto_install: default_true(),
            install_command: default_install_command(),
        }
    }
}
