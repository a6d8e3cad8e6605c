//! Browser installation through an external installer command.

use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::error::BrowserError;

/// Run `command` (program followed by its arguments) to install a browser.
///
/// The default configuration uses `npx --yes playwright install chromium`,
/// which drops the browser into the Playwright cache searched by
/// [`LaunchOptions::find_executable`](crate::LaunchOptions::find_executable).
pub async fn install_browser(command: &[String]) -> Result<(), BrowserError> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| BrowserError::InstallFailed("install command is empty".to_string()))?;

    info!("Installing browser: {}", command.join(" "));

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| BrowserError::InstallFailed(format!("{}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        let tail: Vec<&str> = tail.into_iter().rev().collect();
        return Err(BrowserError::InstallFailed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            tail.join("\n")
        )));
    }

    info!("Browser installed");
    Ok(())
}
