//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_translator(config, &mut result);
        Self::validate_browser(config, &mut result);

        result
    }

    fn validate_translator(config: &Config, result: &mut ValidationResult) {
        let translator = &config.translator;

        if translator.timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "translator.timeout_ms",
                "timeout_ms must be greater than 0",
            ));
        }

        if translator.max_length == 0 {
            result.add_error(ValidationError::new(
                "translator.max_length",
                "max_length must be greater than 0",
            ));
        }

        if translator.max_length > 5000 {
            result.add_warning(ValidationWarning::new(
                "translator.max_length",
                "max_length is above 5000, the site may truncate or reject the text",
            ));
        }

        match url::Url::parse(&translator.base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => result.add_error(ValidationError::new(
                "translator.base_url",
                "base_url must start with http:// or https://",
            )),
            Err(e) => result.add_error(ValidationError::new(
                "translator.base_url",
                format!("base_url is not a valid URL: {}", e),
            )),
        }

        if translator.locale.trim().is_empty() {
            result.add_error(ValidationError::new(
                "translator.locale",
                "locale cannot be empty",
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.launch_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "browser.launch_timeout_ms",
                "launch_timeout_ms must be greater than 0",
            ));
        }

        if browser.auto_install && browser.install_command.is_empty() {
            result.add_error(ValidationError::new(
                "browser.install_command",
                "install_command cannot be empty when auto_install is enabled",
            ));
        }

        if let Some(ref path) = browser.executable {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.executable",
                    format!("Browser executable does not exist: {:?}", path),
                ));
            }
        }

        if !browser.headless {
            result.add_warning(ValidationWarning::new(
                "browser.headless",
                "headless is disabled, a browser window will open for every translation",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
