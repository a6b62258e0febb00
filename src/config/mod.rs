mod types;

pub use types::*;

use anyhow::{Context, Result};
use clipforged_common::paths::sanitize_title;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {:?}", path))
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./clipforged.toml",
        "~/.config/clipforged/config.toml",
        "/etc/clipforged/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if let Some(path) = &config.tools.ytdlp_path {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).to_string();
        if !Path::new(&expanded).exists() {
            tracing::warn!("Configured yt-dlp path does not exist: {:?}", path);
        }
    }

    if config.tools.probe_arg.trim().is_empty() {
        anyhow::bail!("tools.probe_arg cannot be empty");
    }

    let clip = &config.clip;

    if clip.max_concurrent_jobs == 0 {
        anyhow::bail!("clip.max_concurrent_jobs must be at least 1");
    }

    if clip.timeout_secs == 0 {
        anyhow::bail!("clip.timeout_secs must be at least 1");
    }

    if clip.output_container.is_empty()
        || !clip
            .output_container
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
    {
        anyhow::bail!(
            "clip.output_container must be a plain extension like \"mp4\", got {:?}",
            clip.output_container
        );
    }

    if clip.format_selector.trim().is_empty() {
        anyhow::bail!("clip.format_selector cannot be empty");
    }

    if clip.default_filename.is_empty() || sanitize_title(&clip.default_filename) != clip.default_filename
    {
        anyhow::bail!(
            "clip.default_filename may only contain letters, digits, '-', '_' and spaces, got {:?}",
            clip.default_filename
        );
    }

    Ok(())
}
