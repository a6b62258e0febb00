//! External tool detection and availability probing.

use crate::{Error, Result, ToolCommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a trivial version query may take before the tool is considered broken.
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default argument for the trivial probe invocation.
pub const DEFAULT_PROBE_ARG: &str = "--version";

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool exists and answered the probe.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path that was probed.
    pub path: PathBuf,
    /// Why the tool is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check that a tool exists on disk and answers a trivial invocation.
///
/// Never fails; problems are reported through [`ToolInfo::available`] and
/// [`ToolInfo::error`].
///
/// # Example
///
/// ```no_run
/// use clipforged_av::check_tool;
/// use std::path::Path;
///
/// # async fn example() {
/// let info = check_tool(Path::new("/usr/local/bin/yt-dlp"), "--version").await;
/// if info.available {
///     println!("yt-dlp version: {:?}", info.version);
/// }
/// # }
/// ```
pub async fn check_tool(path: &Path, probe_arg: &str) -> ToolInfo {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    match require_tool(path, probe_arg).await {
        Ok(version) => ToolInfo {
            name,
            available: true,
            version,
            path: path.to_path_buf(),
            error: None,
        },
        Err(e) => {
            tracing::debug!("Probe of {:?} failed: {}", path, e);
            ToolInfo {
                name,
                available: false,
                version: None,
                path: path.to_path_buf(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// Return true only if the tool exists and answers `--version` successfully.
pub async fn probe(path: &Path) -> bool {
    check_tool(path, DEFAULT_PROBE_ARG).await.available
}

/// Require that a tool is available, returning its version line.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] when the path does not exist, or the
/// probe invocation's own error when the tool cannot be run.
pub async fn require_tool(path: &Path, probe_arg: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Err(Error::tool_not_found(path));
    }

    let output = ToolCommand::new(path.to_path_buf())
        .arg(probe_arg)
        .timeout(PROBE_TIMEOUT)
        .execute()
        .await?;

    Ok(output.stdout.lines().next().map(|s| s.trim().to_string()))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
///
/// A configured path is returned as-is even if it does not exist, so a
/// misconfiguration surfaces through the availability probe instead of being
/// silently replaced. Without a configured path the tool is looked up on
/// `PATH`, and `fallback` is used when that fails.
pub fn get_tool_path(name: &str, config_path: Option<&Path>, fallback: &Path) -> PathBuf {
    if let Some(path) = config_path {
        return path.to_path_buf();
    }

    which::which(name).unwrap_or_else(|_| fallback.to_path_buf())
}
