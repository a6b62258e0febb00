//! yt-dlp command-line contract for section downloads.

use crate::timecode::SegmentSpec;
use crate::ToolCommand;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefer a progressive or muxable MP4 capped at 1080p.
pub const DEFAULT_FORMAT_SELECTOR: &str =
    "bv[ext=mp4][height<=?1080]+ba[ext=m4a]/best[ext=mp4][height<=?1080]";

/// Referer sent with upstream requests.
pub const DEFAULT_REFERER: &str = "youtube.com";

/// User agent sent with upstream requests.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default forced output container.
pub const DEFAULT_CONTAINER: &str = "mp4";

/// Knobs for a section download that do not vary per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionOptions {
    /// Value for `-f`.
    pub format_selector: String,
    /// Value for `--merge-output-format`; also the output file extension.
    pub output_container: String,
    /// Sent as `--add-header referer:<value>`.
    pub referer: String,
    /// Sent as `--add-header user-agent:<value>`.
    pub user_agent: String,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            format_selector: DEFAULT_FORMAT_SELECTOR.to_string(),
            output_container: DEFAULT_CONTAINER.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Build the full yt-dlp argument list for downloading one section of `url`
/// into `output`.
///
/// The order is fixed: source URL, format selector, section, output path,
/// container, certificate and warning suppression, then header overrides.
pub fn section_args(
    url: &str,
    segment: &SegmentSpec,
    output: &Path,
    options: &SectionOptions,
) -> Vec<String> {
    vec![
        url.to_string(),
        "-f".to_string(),
        options.format_selector.clone(),
        "--download-sections".to_string(),
        segment.to_arg(),
        "-o".to_string(),
        output.to_string_lossy().to_string(),
        "--merge-output-format".to_string(),
        options.output_container.clone(),
        "--no-check-certificates".to_string(),
        "--no-warnings".to_string(),
        "--add-header".to_string(),
        format!("referer:{}", options.referer),
        "--add-header".to_string(),
        format!("user-agent:{}", options.user_agent),
    ]
}

/// Prepare a [`ToolCommand`] that downloads one section of `url` into `output`.
pub fn section_command(
    tool: &Path,
    url: &str,
    segment: &SegmentSpec,
    output: &Path,
    options: &SectionOptions,
    timeout: Duration,
) -> ToolCommand {
    let mut cmd = ToolCommand::new(tool.to_path_buf());
    cmd.args(section_args(url, segment, output, options))
        .timeout(timeout);
    cmd
}
