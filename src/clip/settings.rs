//! Resolved, immutable settings for the clip pipeline.

use crate::config::Config;
use clipforged_av::{get_tool_path, SectionOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name looked up on `PATH` when no tool path is configured.
pub const TOOL_NAME: &str = "yt-dlp";

/// Everything the orchestrator needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ClipSettings {
    /// yt-dlp executable.
    pub tool_path: PathBuf,
    /// Argument for the availability probe.
    pub probe_arg: String,
    /// Shared directory for in-flight output files; created on demand.
    pub temp_dir: PathBuf,
    /// Per-deployment yt-dlp options.
    pub section: SectionOptions,
    /// Wall-clock limit for one job, from permit wait to cleanup.
    pub timeout: Duration,
    /// Maximum concurrent yt-dlp runs.
    pub max_concurrent_jobs: usize,
    /// Download name when the request carries no usable title.
    pub default_filename: String,
}

impl ClipSettings {
    /// Resolve settings from configuration, expanding `~` in paths and
    /// looking up yt-dlp on `PATH` when it is not configured.
    pub fn from_config(config: &Config) -> Self {
        let configured_tool = config.tools.ytdlp_path.as_deref().map(expand_path);
        let tool_path = get_tool_path(
            TOOL_NAME,
            configured_tool.as_deref(),
            &Path::new("bin").join(TOOL_NAME),
        );

        let temp_dir = config
            .clip
            .temp_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| std::env::temp_dir().join("clipforged"));

        Self {
            tool_path,
            probe_arg: config.tools.probe_arg.clone(),
            temp_dir,
            section: SectionOptions {
                format_selector: config.clip.format_selector.clone(),
                output_container: config.clip.output_container.clone(),
                referer: config.clip.referer.clone(),
                user_agent: config.clip.user_agent.clone(),
            },
            timeout: Duration::from_secs(config.clip.timeout_secs),
            max_concurrent_jobs: config.clip.max_concurrent_jobs,
            default_filename: config.clip.default_filename.clone(),
        }
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}
