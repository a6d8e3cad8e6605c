//! Translator options.

use std::time::Duration;

use deepl_cdp::LaunchOptions;
use deepl_config::Config;

/// Per-translator settings. Build from a [`Config`] or start from the defaults.
#[derive(Debug, Clone)]
pub struct TranslatorOptions {
    /// Bound for every wait on the page.
    pub timeout: Duration,
    /// Maximum input length in characters.
    pub max_length: usize,
    /// Drive the page form instead of encoding the text into the URL fragment.
    pub use_dom_submit: bool,
    pub base_url: String,
    pub locale: String,
    pub launch: LaunchOptions,
    /// Run `install_command` once when no browser executable can be found.
    pub auto_install: bool,
    pub install_command: Vec<String>,
}

impl Default for TranslatorOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for TranslatorOptions {
    fn from(config: &Config) -> Self {
        let timeout = Duration::from_millis(config.translator.timeout_ms);
        let browser = &config.browser;

        Self {
            timeout,
            max_length: config.translator.max_length,
            use_dom_submit: config.translator.use_dom_submit,
            base_url: config.translator.base_url.clone(),
            locale: config.translator.locale.clone(),
            launch: LaunchOptions {
                executable: browser.executable.clone(),
                headless: browser.headless,
                launch_timeout: Duration::from_millis(browser.launch_timeout_ms),
                command_timeout: timeout,
                window_width: browser.window_width,
                window_height: browser.window_height,
                extra_args: browser.extra_args.clone(),
            },
            auto_install: browser.auto_install,
            install_command: browser.install_command.clone(),
        }
    }
}

impl TranslatorOptions {
    /// Override the wait timeout, keeping the CDP command bound in step.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.launch.command_timeout = timeout;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}
