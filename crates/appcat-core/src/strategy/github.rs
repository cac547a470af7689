//! GitHub releases: latest release lookup and asset selection.

use serde::Deserialize;

use super::Resolved;
use crate::error::StrategyError;
use crate::http::{get_buffered, is_success, HttpOptions};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Release information (only the fields used for resolution).
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v3.0.0")
    pub tag_name: String,

    /// Release assets, in upstream order
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Release asset
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,

    /// Asset size in bytes
    #[serde(default)]
    pub size: u64,
}

/// Release API endpoint and optional token.
#[derive(Clone)]
pub struct GithubApi {
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GithubApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubApi")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GithubApi {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Read the token from `token_env` when set and non-empty.
    pub fn from_env(base_url: &str, token_env: &str) -> Self {
        Self::new(base_url, std::env::var(token_env).ok())
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn latest_release_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/releases/latest", self.base_url, repo)
    }

    /// Get latest release
    pub fn fetch_latest(&self, repo: &str, opts: &HttpOptions) -> Result<Release, StrategyError> {
        let url = self.latest_release_url(repo);
        tracing::debug!("fetching latest release from: {}", url);

        let mut headers = vec![("Accept", "application/vnd.github+json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {}", token)));
        }

        let (status, body) = get_buffered(&url, &headers, opts)?;
        if !is_success(status) {
            return Err(StrategyError::HttpStatus { url, status });
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Resolve `repo`'s latest release to the first asset matching `asset_filter`.
pub fn resolve(
    api: &GithubApi,
    repo: &str,
    asset_filter: &str,
    opts: &HttpOptions,
) -> Result<Resolved, StrategyError> {
    let release = api.fetch_latest(repo, opts)?;
    select_asset(&release, asset_filter)
}

/// First asset (upstream order) whose name contains `filter`, case-insensitively.
pub fn select_asset(release: &Release, filter: &str) -> Result<Resolved, StrategyError> {
    let needle = filter.to_lowercase();
    release
        .assets
        .iter()
        .find(|a| a.name.to_lowercase().contains(&needle))
        .map(|a| Resolved {
            version: version_from_tag(&release.tag_name).to_string(),
            download_url: a.browser_download_url.clone(),
            declared_size: a.size,
        })
        .ok_or_else(|| StrategyError::NoMatchingAsset {
            filter: filter.to_string(),
            tag: release.tag_name.clone(),
        })
}

/// Strip one leading `v` from a tag (`v1.2.0` → `1.2.0`).
pub fn version_from_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

/// `repo` must look like `owner/name`.
pub(crate) fn validate_repo(repo: &str) -> Result<(), StrategyError> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(())
        }
        _ => Err(StrategyError::InvalidConfig {
            key: "repo",
            reason: format!("`{}` is not owner/name", repo),
        }),
    }
}
