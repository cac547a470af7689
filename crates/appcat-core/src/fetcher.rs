//! Single-stream GET that hashes the body instead of storing it.

use std::time::Duration;

use crate::checksum::{Fingerprint, StreamDigest};
use crate::error::FetchError;
use crate::http::{is_success, HttpOptions, PRODUCT_USER_AGENT};

/// Downloads `url` and returns the SHA-256 and byte count of the body.
///
/// Nothing is written to disk; memory use is the hash state plus curl's buffer.
pub fn fetch_and_hash(url: &str, opts: &HttpOptions) -> Result<Fingerprint, FetchError> {
    let mut digest = StreamDigest::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.useragent(PRODUCT_USER_AGENT)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(1024)?;
    easy.low_speed_time(Duration::from_secs(60))?;
    easy.timeout(opts.download_timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            digest.update(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    if !is_success(status) {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let fingerprint = digest.finish();
    tracing::debug!(url, size = fingerprint.size, "hashed download");
    Ok(fingerprint)
}
