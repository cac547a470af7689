//! Source strategies: how an application's current upstream version and
//! download location are determined.
//!
//! The set is closed. [`Strategy::from_source`] validates the descriptor's
//! config keys up front, and [`resolve`] dispatches to the matching resolver.
//! Resolvers only look at metadata; they never download the artifact.

pub mod github;
pub mod redirect;
pub mod static_link;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::StrategyError;
use crate::http::HttpOptions;
use crate::source::SourceApp;

pub use github::GithubApi;

pub const GITHUB_RELEASE: &str = "github_release";
pub const DIRECT_URL_HEAD: &str = "direct_url_head";
pub const DIRECT_STATIC: &str = "direct_static";

/// Validated strategy with its parameters.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Latest GitHub release; first asset whose name contains `asset_filter`
    /// (case-insensitive).
    GithubRelease { repo: String, asset_filter: String },
    /// HEAD the URL, follow redirects, take the version from the final URL.
    DirectUrlHead { url: String, pattern: Regex },
    /// Fixed link without a version signal.
    DirectStatic { url: String },
}

/// What a strategy found upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub version: String,
    pub download_url: String,
    /// Size announced by upstream; 0 means unknown.
    pub declared_size: u64,
}

/// Everything the resolvers need besides the strategy itself.
#[derive(Debug, Clone)]
pub struct ResolveContext {
    pub http: HttpOptions,
    pub github: GithubApi,
    /// Date used for synthetic `direct_static` versions.
    pub today: NaiveDate,
}

impl Strategy {
    /// Build the strategy named by `src.strategy`, checking its required config keys.
    pub fn from_source(src: &SourceApp) -> Result<Self, StrategyError> {
        match src.strategy.as_str() {
            GITHUB_RELEASE => {
                let repo = required(src, GITHUB_RELEASE, "repo")?;
                let asset_filter = required(src, GITHUB_RELEASE, "asset_filter")?;
                github::validate_repo(repo)?;
                Ok(Strategy::GithubRelease {
                    repo: repo.to_string(),
                    asset_filter: asset_filter.to_string(),
                })
            }
            DIRECT_URL_HEAD => {
                let url = required(src, DIRECT_URL_HEAD, "url")?;
                let regex = required(src, DIRECT_URL_HEAD, "regex")?;
                Ok(Strategy::DirectUrlHead {
                    url: validate_url(url)?,
                    pattern: redirect::compile_pattern(regex)?,
                })
            }
            DIRECT_STATIC => {
                let url = required(src, DIRECT_STATIC, "url")?;
                Ok(Strategy::DirectStatic {
                    url: validate_url(url)?,
                })
            }
            other => Err(StrategyError::UnknownStrategy(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::GithubRelease { .. } => GITHUB_RELEASE,
            Strategy::DirectUrlHead { .. } => DIRECT_URL_HEAD,
            Strategy::DirectStatic { .. } => DIRECT_STATIC,
        }
    }

    /// The resolved version is not evidence of change; compare checksums after download.
    pub fn force_check(&self) -> bool {
        matches!(self, Strategy::DirectStatic { .. })
    }
}

/// Dispatch to the resolver for `strategy`.
pub fn resolve(strategy: &Strategy, ctx: &ResolveContext) -> Result<Resolved, StrategyError> {
    match strategy {
        Strategy::GithubRelease { repo, asset_filter } => {
            github::resolve(&ctx.github, repo, asset_filter, &ctx.http)
        }
        Strategy::DirectUrlHead { url, pattern } => redirect::resolve(url, pattern, &ctx.http),
        Strategy::DirectStatic { url } => Ok(static_link::resolve(url, ctx.today)),
    }
}

fn required<'a>(
    src: &'a SourceApp,
    strategy: &'static str,
    key: &'static str,
) -> Result<&'a str, StrategyError> {
    src.config
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(StrategyError::MissingConfig { strategy, key })
}

fn validate_url(raw: &str) -> Result<String, StrategyError> {
    let parsed = url::Url::parse(raw).map_err(|e| StrategyError::InvalidConfig {
        key: "url",
        reason: format!("{}: {}", raw, e),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        scheme => Err(StrategyError::InvalidConfig {
            key: "url",
            reason: format!("unsupported scheme `{}`", scheme),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn src(strategy: &str, config: &[(&str, &str)]) -> SourceApp {
        SourceApp {
            id: "app".to_string(),
            name: "App".to_string(),
            description: String::new(),
            icon_url: String::new(),
            package_name: String::new(),
            install_type: String::new(),
            strategy: strategy.to_string(),
            config: config
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn github_release_from_source() {
        let s = Strategy::from_source(&src(
            "github_release",
            &[("repo", "owner/name"), ("asset_filter", "linux")],
        ))
        .unwrap();
        match &s {
            Strategy::GithubRelease { repo, asset_filter } => {
                assert_eq!(repo, "owner/name");
                assert_eq!(asset_filter, "linux");
            }
            _ => panic!("expected GithubRelease"),
        }
        assert_eq!(s.name(), GITHUB_RELEASE);
        assert!(!s.force_check());
    }

    #[test]
    fn github_release_missing_filter() {
        let err = Strategy::from_source(&src("github_release", &[("repo", "owner/name")]))
            .unwrap_err();
        match err {
            StrategyError::MissingConfig { strategy, key } => {
                assert_eq!(strategy, GITHUB_RELEASE);
                assert_eq!(key, "asset_filter");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let err = Strategy::from_source(&src("direct_static", &[("url", "  ")])).unwrap_err();
        assert!(matches!(err, StrategyError::MissingConfig { key: "url", .. }));
    }

    #[test]
    fn direct_url_head_requires_capture_group() {
        let err = Strategy::from_source(&src(
            "direct_url_head",
            &[("url", "https://example.com/latest"), ("regex", r"app-\d+")],
        ))
        .unwrap_err();
        assert!(matches!(err, StrategyError::InvalidConfig { key: "regex", .. }));
    }

    #[test]
    fn direct_url_head_rejects_bad_regex() {
        let err = Strategy::from_source(&src(
            "direct_url_head",
            &[("url", "https://example.com/latest"), ("regex", r"app-(\d+")],
        ))
        .unwrap_err();
        assert!(matches!(err, StrategyError::InvalidConfig { key: "regex", .. }));
    }

    #[test]
    fn direct_static_is_force_check() {
        let s = Strategy::from_source(&src(
            "direct_static",
            &[("url", "https://dl.example.com/chrome.deb")],
        ))
        .unwrap();
        assert!(s.force_check());
        assert_eq!(s.name(), DIRECT_STATIC);
    }

    #[test]
    fn rejects_non_http_url() {
        let err = Strategy::from_source(&src("direct_static", &[("url", "ftp://example.com/a")]))
            .unwrap_err();
        assert!(matches!(err, StrategyError::InvalidConfig { key: "url", .. }));
    }

    #[test]
    fn unknown_strategy() {
        let err = Strategy::from_source(&src("snap_store", &[])).unwrap_err();
        assert!(matches!(err, StrategyError::UnknownStrategy(ref s) if s == "snap_store"));
    }

    #[test]
    fn resolve_static_needs_no_network() {
        let s = Strategy::DirectStatic {
            url: "https://dl.example.com/chrome.deb".to_string(),
        };
        let ctx = ResolveContext {
            http: HttpOptions::default(),
            github: GithubApi::new("http://127.0.0.1:9", None),
            today: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        };
        let r = resolve(&s, &ctx).unwrap();
        assert_eq!(r.version, "2024.03.07");
        assert_eq!(r.declared_size, 0);
    }
}
