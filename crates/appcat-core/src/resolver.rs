//! Network boundary of the engine.
//!
//! The reconciliation engine only depends on this trait and does not know
//! about curl or the GitHub API; tests drive it with scripted upstreams.

use chrono::NaiveDate;

use crate::checksum::Fingerprint;
use crate::config::AppcatConfig;
use crate::error::{FetchError, StrategyError};
use crate::fetcher;
use crate::http::HttpOptions;
use crate::strategy::{self, GithubApi, ResolveContext, Resolved, Strategy};

/// Upstream metadata lookups and artifact downloads.
pub trait Upstream {
    /// Determine version, download URL and declared size. Never downloads the artifact.
    fn resolve(&self, strategy: &Strategy) -> Result<Resolved, StrategyError>;

    /// Download `url` and return its checksum and measured size.
    fn fetch(&self, url: &str) -> Result<Fingerprint, FetchError>;
}

/// Live upstream backed by libcurl.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    ctx: ResolveContext,
}

impl HttpUpstream {
    pub fn new(ctx: ResolveContext) -> Self {
        Self { ctx }
    }

    /// Build from config; the GitHub token is read from the configured env var
    /// and `today` is the local date.
    pub fn from_config(cfg: &AppcatConfig) -> Self {
        let github = GithubApi::from_env(&cfg.github_api_url, &cfg.github_token_env);
        if !github.has_token() {
            tracing::debug!(
                "{} not set; GitHub API calls are unauthenticated",
                cfg.github_token_env
            );
        }
        Self::new(ResolveContext {
            http: HttpOptions::from_config(cfg),
            github,
            today: chrono::Local::now().date_naive(),
        })
    }

    /// Override the date used for `direct_static` versions.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.ctx.today = today;
        self
    }
}

impl Upstream for HttpUpstream {
    fn resolve(&self, strategy: &Strategy) -> Result<Resolved, StrategyError> {
        strategy::resolve(strategy, &self.ctx)
    }

    fn fetch(&self, url: &str) -> Result<Fingerprint, FetchError> {
        fetcher::fetch_and_hash(url, &self.ctx.http)
    }
}
