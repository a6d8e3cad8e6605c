//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Expand `~` in every path-valued field.
    fn expand_paths(config: &mut Config) {
        let expand = |path: &Path| PathBuf::from(Self::expand_path(&path.to_string_lossy()));
        config.browser.executable = config.browser.executable.as_deref().map(expand);
        config.logging.directory = config.logging.directory.as_deref().map(expand);
    }

    /// Load the per-user config file if there is one, defaults otherwise.
    pub fn load_default() -> Result<Config, ConfigError> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Config::default()),
        }
    }

    /// `<config_dir>/deepl-cli/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("deepl-cli").join("config.toml"))
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidValue {
            field: "env".to_string(),
            message: e.to_string(),
        })?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.config`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.translator.timeout_ms, 15000);
        assert_eq!(config.translator.max_length, 5000);
    }

    #[test]
    fn test_load_translator_section() {
        let content = r#"
            [translator]
            timeout_ms = 30000
            use_dom_submit = true
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.translator.timeout_ms, 30000);
        assert!(config.translator.use_dom_submit);
        assert_eq!(config.translator.locale, "en");
    }

    #[test]
    fn test_load_full_config() {
        let content = r#"
            [translator]
            timeout_ms = 20000
            max_length = 1500
            base_url = "https://www.deepl.com"
            locale = "ja"

            [browser]
            executable = "/usr/bin/chromium"
            headless = false
            extra_args = ["--lang=ja"]
            auto_install = false

            [logging]
            level = "debug"
            directory = "/tmp/deepl-logs"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.translator.max_length, 1500);
        assert_eq!(config.translator.locale, "ja");
        assert_eq!(
            config.browser.executable.as_deref(),
            Some(Path::new("/usr/bin/chromium"))
        );
        assert!(!config.browser.headless);
        assert_eq!(config.browser.extra_args, vec!["--lang=ja".to_string()]);
        assert!(!config.browser.auto_install);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.directory.as_deref(),
            Some(Path::new("/tmp/deepl-logs"))
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[translator]").unwrap();
        writeln!(file, "timeout_ms = 5000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.translator.timeout_ms, 5000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("DEEPL_TEST_CHROME_PATH", "/opt/chrome/chrome");
        }
        let content = "[browser]\nexecutable = \"${DEEPL_TEST_CHROME_PATH}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(
            config.browser.executable.as_deref(),
            Some(Path::new("/opt/chrome/chrome"))
        );
        unsafe {
            std::env::remove_var("DEEPL_TEST_CHROME_PATH");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_DEEPL_TEST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }

    #[test]
    fn test_load_expands_tilde_paths() {
        let content = "[logging]\ndirectory = \"~/.deepl-cli/logs\"";
        let config = ConfigLoader::load_str(content).unwrap();
        let dir = config.logging.directory.unwrap();
        assert!(!dir.starts_with("~"));
        assert!(dir.ends_with(".deepl-cli/logs"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/logs");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/logs"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let path = "/usr/local/bin";
        assert_eq!(ConfigLoader::expand_path(path), path);
    }

    #[test]
    fn test_default_path_location() {
        if let Some(path) = ConfigLoader::default_path() {
            assert!(path.ends_with("deepl-cli/config.toml"));
        }
    }
}
