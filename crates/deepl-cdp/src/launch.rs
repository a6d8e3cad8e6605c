//! Browser launch options and executable discovery.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use walkdir::WalkDir;

/// File the browser writes into its profile once DevTools is listening.
pub(crate) const DEVTOOLS_PORT_FILE: &str = "DevToolsActivePort";

/// Browser launch configuration.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Explicit executable. Searched for when `None`.
    pub executable: Option<PathBuf>,
    /// Whether to run in headless mode.
    pub headless: bool,
    /// How long to wait for the DevTools endpoint to come up.
    pub launch_timeout: Duration,
    /// Upper bound for a single CDP command round trip.
    pub command_timeout: Duration,
    pub window_width: u32,
    pub window_height: u32,
    /// Additional switches appended after the defaults.
    pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            launch_timeout: Duration::from_secs(20),
            command_timeout: Duration::from_secs(30),
            window_width: 1920,
            window_height: 1080,
            extra_args: Vec::new(),
        }
    }
}

impl LaunchOptions {
    /// Command-line switches for a browser using `profile_dir`.
    pub fn args(&self, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--remote-debugging-port=0".to_string(),
            format!("--user-data-dir={}", profile_dir.display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--no-sandbox".to_string(),
            "--no-zygote".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
            "--metrics-recording-only".to_string(),
            format!("--window-size={},{}", self.window_width, self.window_height),
        ];

        if self.headless {
            args.push("--headless=new".to_string());
        }

        args.extend(self.extra_args.iter().cloned());
        args.push("about:blank".to_string());
        args
    }

    /// Resolve the executable to launch.
    ///
    /// An explicit path wins (and must exist). Otherwise well-known install
    /// locations are checked, then `PATH`, then the Playwright browser cache.
    pub fn find_executable(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.executable {
            return path.exists().then(|| path.clone());
        }

        well_known_paths()
            .into_iter()
            .find(|p| p.exists())
            .or_else(find_on_path)
            .or_else(find_in_playwright_cache)
    }
}

fn well_known_paths() -> Vec<PathBuf> {
    let paths: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ]
    };
    paths.iter().map(PathBuf::from).collect()
}

fn find_on_path() -> Option<PathBuf> {
    const NAMES: &[&str] = &[
        "google-chrome",
        "google-chrome-stable",
        "chromium",
        "chromium-browser",
        "chrome",
    ];
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        NAMES.iter().find_map(|name| {
            let candidate = dir.join(name);
            candidate.is_file().then_some(candidate)
        })
    })
}

/// Root of the Playwright browser cache, honouring `PLAYWRIGHT_BROWSERS_PATH`.
pub(crate) fn playwright_cache_dir() -> Option<PathBuf> {
    if let Some(custom) = std::env::var_os("PLAYWRIGHT_BROWSERS_PATH") {
        return Some(PathBuf::from(custom));
    }
    dirs::cache_dir().map(|dir| dir.join("ms-playwright"))
}

fn find_in_playwright_cache() -> Option<PathBuf> {
    let root = playwright_cache_dir()?;
    let found = find_browser_under(&root);
    if let Some(ref path) = found {
        debug!("Found cached browser at {}", path.display());
    }
    found
}

/// Newest browser binary below `root`, judged by the numeric revision of the
/// top-level `<name>-<revision>` directory.
pub(crate) fn find_browser_under(root: &Path) -> Option<PathBuf> {
    const BINARIES: &[&str] = &["chrome", "chrome.exe", "Chromium", "headless_shell"];

    let mut candidates: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(6)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| BINARIES.contains(&name))
        })
        .map(|entry| entry.into_path())
        .collect();

    candidates.sort_by_cached_key(|path| (revision_of(root, path), path.clone()));
    candidates.pop()
}

/// Revision number of the cache directory holding `path`, 0 when it has none.
fn revision_of(root: &Path, path: &Path) -> u64 {
    path.strip_prefix(root)
        .ok()
        .and_then(|rel| rel.components().next())
        .and_then(|dir| dir.as_os_str().to_str())
        .and_then(|dir| dir.rsplit_once('-'))
        .and_then(|(_, revision)| revision.parse().ok())
        .unwrap_or(0)
}

/// Parse the port from a `DevToolsActivePort` file (port on the first line).
pub(crate) fn parse_devtools_port(content: &str) -> Option<u16> {
    content.lines().next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = LaunchOptions::default();
        assert!(options.headless);
        assert_eq!(options.window_width, 1920);
        assert_eq!(options.window_height, 1080);
        assert!(options.executable.is_none());
    }

    #[test]
    fn test_args_headless() {
        let options = LaunchOptions::default();
        let args = options.args(Path::new("/tmp/profile"));
        assert!(args.contains(&"--remote-debugging-port=0".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--window-size=1920,1080".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn test_args_headful_with_extra() {
        let options = LaunchOptions {
            headless: false,
            extra_args: vec!["--lang=ja".to_string()],
            ..Default::default()
        };
        let args = options.args(Path::new("/tmp/profile"));
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
        assert!(args.contains(&"--lang=ja".to_string()));
    }

    #[test]
    fn test_explicit_missing_executable() {
        let options = LaunchOptions {
            executable: Some(PathBuf::from("/nonexistent/chrome")),
            ..Default::default()
        };
        assert!(options.find_executable().is_none());
    }

    #[test]
    fn test_explicit_existing_executable() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let options = LaunchOptions {
            executable: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(options.find_executable().as_deref(), Some(file.path()));
    }

    #[test]
    fn test_find_browser_under_picks_newest_revision() {
        let root = tempfile::tempdir().unwrap();
        for revision in ["chromium-1091", "chromium-1105"] {
            let dir = root.path().join(revision).join("chrome-linux");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("chrome"), b"").unwrap();
        }
        std::fs::write(root.path().join("README"), b"").unwrap();

        let found = find_browser_under(root.path()).unwrap();
        assert!(found.ends_with("chromium-1105/chrome-linux/chrome"));
    }

    #[test]
    fn test_find_browser_under_compares_revisions_numerically() {
        let root = tempfile::tempdir().unwrap();
        for revision in ["chromium-999", "chromium-1105"] {
            let dir = root.path().join(revision).join("chrome-linux");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("chrome"), b"").unwrap();
        }

        let found = find_browser_under(root.path()).unwrap();
        assert!(found.ends_with("chromium-1105/chrome-linux/chrome"));
        assert_eq!(revision_of(root.path(), &found), 1105);
        assert_eq!(revision_of(root.path(), &root.path().join("chrome")), 0);
    }

    #[test]
    fn test_find_browser_under_empty() {
        let root = tempfile::tempdir().unwrap();
        assert!(find_browser_under(root.path()).is_none());
    }

    #[test]
    fn test_parse_devtools_port() {
        assert_eq!(
            parse_devtools_port("40123\n/devtools/browser/2f1e-aa\n"),
            Some(40123)
        );
        assert_eq!(parse_devtools_port(""), None);
        assert_eq!(parse_devtools_port("garbage\n"), None);
    }
}
