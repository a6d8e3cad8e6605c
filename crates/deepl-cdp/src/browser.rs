//! A browser process owned by this crate.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::client::CdpClient;
use crate::error::BrowserError;
use crate::launch::{parse_devtools_port, LaunchOptions, DEVTOOLS_PORT_FILE};
use crate::session::PageSession;

/// How long [`Browser::close`] waits for a graceful exit before killing.
const EXIT_GRACE: Duration = Duration::from_secs(5);

/// A launched browser with its own temporary profile.
///
/// Dropping it kills the process and deletes the profile, so a cancelled
/// future never leaves a browser behind. [`Browser::close`] is the graceful
/// path.
pub struct Browser {
    client: CdpClient,
    child: Child,
    pid: Option<u32>,
    // Dropped after the child so the profile outlives the process.
    _profile: TempDir,
}

impl Browser {
    /// Spawn a browser and connect to its DevTools endpoint.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, BrowserError> {
        let executable = options
            .find_executable()
            .ok_or(BrowserError::ChromeNotFound)?;
        let profile = tempfile::Builder::new().prefix("deepl-cli-").tempdir()?;

        debug!("Launching {} with profile {}", executable.display(), profile.path().display());

        let mut child = Command::new(&executable)
            .args(options.args(profile.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => BrowserError::ChromeNotFound,
                _ => BrowserError::LaunchFailed(e.to_string()),
            })?;

        let pid = child.id();
        match pid {
            Some(pid) => info!(pid, "Browser launched"),
            None => info!("Browser launched"),
        }

        let port = Self::wait_for_port(&mut child, &profile, options.launch_timeout).await?;
        let endpoint = format!("http://127.0.0.1:{}", port);
        let client = CdpClient::connect(&endpoint, options.command_timeout).await?;

        debug!("Connected to {} at {}", client.product(), endpoint);

        Ok(Self {
            client,
            child,
            pid,
            _profile: profile,
        })
    }

    /// Poll the profile for `DevToolsActivePort` until the browser is listening.
    async fn wait_for_port(
        child: &mut Child,
        profile: &TempDir,
        timeout: Duration,
    ) -> Result<u16, BrowserError> {
        let port_file = profile.path().join(DEVTOOLS_PORT_FILE);
        let start = Instant::now();

        loop {
            if let Ok(content) = tokio::fs::read_to_string(&port_file).await {
                if let Some(port) = parse_devtools_port(&content) {
                    return Ok(port);
                }
            }

            if let Some(status) = child.try_wait()? {
                return Err(BrowserError::LaunchFailed(format!(
                    "browser exited during startup ({})",
                    status
                )));
            }

            if start.elapsed() > timeout {
                return Err(BrowserError::LaunchFailed(format!(
                    "DevTools endpoint did not come up within {} ms",
                    timeout.as_millis()
                )));
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// OS process ID, while the process is running.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Open a new blank page.
    pub async fn new_page(&self) -> Result<PageSession, BrowserError> {
        Ok(self.client.new_page().await?)
    }

    /// Ask the browser to exit, kill it if it does not, and remove the profile.
    pub async fn close(mut self) -> Result<(), BrowserError> {
        if let Err(e) = self.client.close_browser().await {
            warn!("Browser.close failed: {}", e);
        }

        match tokio::time::timeout(EXIT_GRACE, self.child.wait()).await {
            Ok(Ok(status)) => debug!("Browser exited ({})", status),
            Ok(Err(e)) => warn!("Waiting for browser exit failed: {}", e),
            Err(_) => {
                warn!("Browser did not exit within {:?}, killing", EXIT_GRACE);
                self.child.kill().await?;
            }
        }

        info!("Browser closed");
        Ok(())
    }
}
