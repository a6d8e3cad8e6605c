//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

mod schema_browser;
mod schema_logging;

pub use schema_browser::*;
pub use schema_logging::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translator: TranslatorConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Translation request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Bound applied to every page wait, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum input length in characters, after trailing newlines are trimmed.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Drive the page form instead of encoding the text into the URL fragment.
    #[serde(default)]
    pub use_dom_submit: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// UI locale segment of the translator URL.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_timeout_ms() -> u64 {
    15000
}

fn default_max_length() -> usize {
    5000
}

fn default_base_url() -> String {
    "https://www.deepl.com".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_length: default_max_length(),
            use_dom_submit: false,
            base_url: default_base_url(),
            locale: default_locale(),
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
