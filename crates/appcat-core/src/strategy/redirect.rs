//! Redirect-derived versions: HEAD the start URL and read the version out of
//! wherever it redirects to.

use regex::Regex;

use super::Resolved;
use crate::error::StrategyError;
use crate::fetch_head;
use crate::http::{is_success, HttpOptions};

pub fn resolve(url: &str, pattern: &Regex, opts: &HttpOptions) -> Result<Resolved, StrategyError> {
    let head = fetch_head::probe(url, opts)?;
    if !is_success(head.status) {
        return Err(StrategyError::HttpStatus {
            url: head.final_url,
            status: head.status,
        });
    }
    tracing::debug!("{} resolved to {}", url, head.final_url);

    let version = extract_version(pattern, &head.final_url)?;
    Ok(Resolved {
        version,
        download_url: head.final_url,
        declared_size: head.content_length.unwrap_or(0),
    })
}

/// First capture group of `pattern` in `url`.
pub fn extract_version(pattern: &Regex, url: &str) -> Result<String, StrategyError> {
    pattern
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| StrategyError::NoVersionMatch {
            pattern: pattern.as_str().to_string(),
            url: url.to_string(),
        })
}

/// Compile a version pattern; it must have a capture group.
pub(crate) fn compile_pattern(raw: &str) -> Result<Regex, StrategyError> {
    let re = Regex::new(raw).map_err(|e| StrategyError::InvalidConfig {
        key: "regex",
        reason: e.to_string(),
    })?;
    if re.captures_len() < 2 {
        return Err(StrategyError::InvalidConfig {
            key: "regex",
            reason: format!("`{}` has no capture group", raw),
        });
    }
    Ok(re)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_group() {
        let re = compile_pattern(r"app-(\d+\.\d+\.\d+)\.tar\.gz").unwrap();
        let v = extract_version(&re, "https://cdn.example.com/dl/app-2.3.1.tar.gz").unwrap();
        assert_eq!(v, "2.3.1");
    }

    #[test]
    fn non_match_is_error() {
        let re = compile_pattern(r"app-(\d+)").unwrap();
        let err = extract_version(&re, "https://cdn.example.com/latest").unwrap_err();
        match err {
            StrategyError::NoVersionMatch { pattern, url } => {
                assert_eq!(pattern, r"app-(\d+)");
                assert_eq!(url, "https://cdn.example.com/latest");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn optional_group_not_participating_is_error() {
        let re = compile_pattern(r"app(-\d+)?\.zip").unwrap();
        assert!(extract_version(&re, "https://x/app.zip").is_err());
    }

    #[test]
    fn pattern_without_group_rejected() {
        assert!(compile_pattern(r"app-\d+").is_err());
    }
}
