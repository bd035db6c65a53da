//! Parse HTTP response header lines into an ordered, case-insensitive multi-map.

/// Response headers in arrival order. Repeated names (e.g. `Set-Cookie`) are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders(Vec<(String, String)>);

impl ResponseHeaders {
    /// Parse collected header lines. Status lines and blanks are skipped.
    pub fn from_lines(lines: &[String]) -> Self {
        let mut out = Vec::new();
        for line in lines {
            let line = line.trim();
            if line.is_empty() || line.starts_with("HTTP/") {
                continue;
            }
            if let Some((name, value)) = line.split_once(':') {
                out.push((name.trim().to_string(), value.trim().to_string()));
            }
        }
        ResponseHeaders(out)
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in arrival order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn set_cookies(&self) -> Vec<&str> {
        self.get_all("set-cookie")
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.get("content-disposition")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Status code from a line like `HTTP/1.1 403 Forbidden` or `HTTP/2 200`.
pub(crate) fn parse_status_line(line: &str) -> Option<u32> {
    let line = line.trim();
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_skips_status_and_blank_lines() {
        let h = ResponseHeaders::from_lines(&lines(&[
            "HTTP/1.1 200 OK",
            "Content-Length: 12345",
            "",
        ]));
        assert_eq!(h.get("content-length"), Some("12345"));
        assert_eq!(h.iter().count(), 1);
    }

    #[test]
    fn repeated_set_cookie_kept_in_order() {
        let h = ResponseHeaders::from_lines(&lines(&[
            "Set-Cookie: csrftoken=abc; Path=/",
            "set-cookie: other=1",
        ]));
        assert_eq!(h.set_cookies(), vec!["csrftoken=abc; Path=/", "other=1"]);
        assert_eq!(h.get("SET-COOKIE"), Some("csrftoken=abc; Path=/"));
    }

    #[test]
    fn parse_headers_content_disposition() {
        let h = ResponseHeaders::from_lines(&lines(&[
            "Content-Disposition: attachment; filename=\"Lecture 1: Intro.mp4\"",
        ]));
        assert_eq!(
            h.content_disposition(),
            Some("attachment; filename=\"Lecture 1: Intro.mp4\"")
        );
    }

    #[test]
    fn status_line_parsing() {
        assert_eq!(parse_status_line("HTTP/1.1 403 Forbidden\r\n"), Some(403));
        assert_eq!(parse_status_line("HTTP/2 200"), Some(200));
        assert_eq!(parse_status_line("Content-Type: text/html"), None);
    }
}
