//! Shared libcurl request settings and a small buffered GET for JSON APIs.

use std::time::Duration;

use crate::config::AppcatConfig;

/// Product user agent for API calls (GitHub rejects requests without one).
pub const PRODUCT_USER_AGENT: &str = concat!("appcat/", env!("CARGO_PKG_VERSION"));

/// Timeouts and identities applied to every request of a run.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Total timeout for metadata requests (release API, HEAD probe).
    pub request_timeout: Duration,
    /// Total timeout for one artifact download.
    pub download_timeout: Duration,
    /// Browser-like user agent for endpoints that reject unknown clients.
    pub browser_user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from_config(&AppcatConfig::default())
    }
}

impl HttpOptions {
    pub fn from_config(cfg: &AppcatConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            download_timeout: Duration::from_secs(cfg.download_timeout_secs),
            browser_user_agent: cfg.browser_user_agent.clone(),
        }
    }
}

/// Build a curl header list from `(name, value)` pairs.
pub(crate) fn header_list(headers: &[(&str, String)]) -> Result<curl::easy::List, curl::Error> {
    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    Ok(list)
}

/// True for 2xx.
pub(crate) fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}

/// Plain GET that buffers the (small) body. Returns the final status and body.
pub(crate) fn get_buffered(
    url: &str,
    headers: &[(&str, String)],
    opts: &HttpOptions,
) -> Result<(u32, Vec<u8>), curl::Error> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.useragent(PRODUCT_USER_AGENT)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    if !headers.is_empty() {
        easy.http_headers(header_list(headers)?)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    Ok((code, body))
}
