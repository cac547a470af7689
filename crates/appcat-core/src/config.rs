use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::strategy::github::DEFAULT_API_URL;

pub const DEFAULT_BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Global configuration loaded from `~/.config/appcat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppcatConfig {
    /// Source descriptor list (JSON array).
    pub sources_path: PathBuf,
    /// Catalog file read at start and rewritten when something changed.
    pub catalog_path: PathBuf,
    /// Total timeout in seconds for metadata requests (release API, HEAD probe).
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds for every request.
    pub connect_timeout_secs: u64,
    /// Total timeout in seconds for downloading and hashing one artifact.
    pub download_timeout_secs: u64,
    /// Base URL of the GitHub REST API.
    pub github_api_url: String,
    /// Environment variable holding the GitHub API token.
    pub github_token_env: String,
    /// User agent sent by `direct_url_head` probes.
    pub browser_user_agent: String,
    /// Drop catalog entries whose application is no longer in the source list.
    pub prune_removed: bool,
}

impl Default for AppcatConfig {
    fn default() -> Self {
        Self {
            sources_path: PathBuf::from("apps.source.json"),
            catalog_path: PathBuf::from("catalog.json"),
            request_timeout_secs: 10,
            connect_timeout_secs: 15,
            download_timeout_secs: 3600,
            github_api_url: DEFAULT_API_URL.to_string(),
            github_token_env: "GITHUB_TOKEN".to_string(),
            browser_user_agent: DEFAULT_BROWSER_USER_AGENT.to_string(),
            prune_removed: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("appcat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AppcatConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AppcatConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<AppcatConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AppcatConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
