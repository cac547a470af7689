//! Parse collected response header lines.

/// `Content-Length` of the last response in a redirect chain.
///
/// libcurl reports headers of every hop; a status line starts a new response,
/// so earlier values are discarded.
pub(crate) fn final_content_length(lines: &[String]) -> Option<u64> {
    let mut content_length = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse::<u64>().ok();
            }
        }
    }

    content_length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_response_content_length() {
        let l = lines(&["HTTP/1.1 200 OK", "Content-Length: 12345", "Accept-Ranges: bytes"]);
        assert_eq!(final_content_length(&l), Some(12345));
    }

    #[test]
    fn redirect_chain_uses_last_response() {
        let l = lines(&[
            "HTTP/1.1 302 Found",
            "Location: https://cdn.example.com/app-2.3.1.tar.gz",
            "Content-Length: 0",
            "",
            "HTTP/1.1 200 OK",
            "content-length: 987654",
        ]);
        assert_eq!(final_content_length(&l), Some(987654));
    }

    #[test]
    fn missing_on_final_response() {
        let l = lines(&[
            "HTTP/1.1 301 Moved Permanently",
            "Content-Length: 178",
            "",
            "HTTP/2 200",
            "content-type: application/octet-stream",
        ]);
        assert_eq!(final_content_length(&l), None);
    }

    #[test]
    fn unparseable_value_is_none() {
        let l = lines(&["HTTP/1.1 200 OK", "Content-Length: lots"]);
        assert_eq!(final_content_length(&l), None);
    }
}
