use clipforged_av::ytdlp::{
    DEFAULT_CONTAINER, DEFAULT_FORMAT_SELECTOR, DEFAULT_REFERER, DEFAULT_USER_AGENT,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub clip: ClipConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin (default: true)
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_cors() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: default_cors(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable. Looked up on PATH when unset.
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Argument for the availability probe invocation
    #[serde(default = "default_probe_arg")]
    pub probe_arg: String,
}

fn default_probe_arg() -> String {
    clipforged_av::tools::DEFAULT_PROBE_ARG.to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            probe_arg: default_probe_arg(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClipConfig {
    /// Directory for in-flight clip files (default: <system temp>/clipforged)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Container passed to `--merge-output-format`; also the file extension
    #[serde(default = "default_container")]
    pub output_container: String,

    #[serde(default = "default_format_selector")]
    pub format_selector: String,

    #[serde(default = "default_referer")]
    pub referer: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Wall-clock limit for one job, queueing included; yt-dlp is killed when it expires
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum yt-dlp invocations running at once
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    /// Download name used when the request has no usable title
    #[serde(default = "default_filename")]
    pub default_filename: String,
}

fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}
fn default_format_selector() -> String {
    DEFAULT_FORMAT_SELECTOR.to_string()
}
fn default_referer() -> String {
    DEFAULT_REFERER.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_timeout_secs() -> u64 {
    600
}
fn default_max_concurrent_jobs() -> usize {
    2
}
fn default_filename() -> String {
    "clip".to_string()
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            output_container: default_container(),
            format_selector: default_format_selector(),
            referer: default_referer(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
            default_filename: default_filename(),
        }
    }
}
