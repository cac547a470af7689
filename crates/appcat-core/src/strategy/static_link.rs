//! Static links carry no version. The date stands in for one and the
//! checksum comparison after download decides whether anything changed.

use chrono::NaiveDate;

use super::Resolved;

/// `YYYY.MM.DD`
pub const DATE_VERSION_FORMAT: &str = "%Y.%m.%d";

pub fn resolve(url: &str, today: NaiveDate) -> Resolved {
    Resolved {
        version: date_version(today),
        download_url: url.to_string(),
        declared_size: 0,
    }
}

pub fn date_version(date: NaiveDate) -> String {
    date.format(DATE_VERSION_FORMAT).to_string()
}
