//! Typed errors for the three failure classes of a reconciliation run.
//!
//! Only `ConfigLoadError` aborts a run. `StrategyError` and `FetchError` are
//! caught at the application boundary and turned into carry-forward.

use std::path::PathBuf;

use thiserror::Error;

/// The source descriptor list could not be loaded. Fatal for the run.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("read source list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse source list {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Upstream version/location could not be determined for one application.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("unknown strategy `{0}`")]
    UnknownStrategy(String),

    #[error("strategy `{strategy}` requires config key `{key}`")]
    MissingConfig {
        strategy: &'static str,
        key: &'static str,
    },

    #[error("invalid config `{key}`: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    #[error("request failed: {0}")]
    Transport(#[from] curl::Error),

    #[error("parse release metadata: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no asset matching `{filter}` in release {tag}")]
    NoMatchingAsset { filter: String, tag: String },

    #[error("pattern `{pattern}` did not match {url}")]
    NoVersionMatch { pattern: String, url: String },
}

/// Download-and-hash of a resolved artifact failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    #[error("download failed: {0}")]
    Transport(#[from] curl::Error),
}
