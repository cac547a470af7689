//! HTTP HEAD probing with redirect following.
//!
//! Uses the curl crate (libcurl) to find where a starting URL finally lands
//! and what `Content-Length` the final response declares.

mod parse;

use std::str;

use crate::http::{header_list, HttpOptions};

/// Result of a HEAD request after all redirects.
#[derive(Debug, Clone)]
pub struct HeadResult {
    /// URL of the last response in the redirect chain.
    pub final_url: String,
    /// Status of the last response.
    pub status: u32,
    /// `Content-Length` of the last response, if present.
    pub content_length: Option<u64>,
}

/// Performs a HEAD request identifying as a browser and returns final-response metadata.
///
/// Follows redirects. Runs in the current thread.
pub fn probe(url: &str, opts: &HttpOptions) -> Result<HeadResult, curl::Error> {
    let mut headers: Vec<String> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(&opts.browser_user_agent)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    easy.http_headers(header_list(&[("Accept", "*/*".to_string())])?)?;

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    let final_url = easy
        .effective_url()?
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    Ok(HeadResult {
        final_url,
        status,
        content_length: parse::final_content_length(&headers),
    })
}
