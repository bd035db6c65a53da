//! Filename extraction from URL path.

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// The segment is returned as it appears in the URL (still percent-encoded).
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            filename_from_url_path("https://example.com/a/b/file.pdf").as_deref(),
            Some("file.pdf")
        );
        assert_eq!(
            filename_from_url_path("https://example.com/single").as_deref(),
            Some("single")
        );
    }

    #[test]
    fn root_or_empty() {
        assert_eq!(filename_from_url_path("https://example.com/"), None);
        assert_eq!(filename_from_url_path("https://example.com"), None);
        assert_eq!(filename_from_url_path("forum:123"), None);
    }

    #[test]
    fn with_query_and_encoding() {
        assert_eq!(
            filename_from_url_path("https://example.com/Week%201.mp4?token=abc").as_deref(),
            Some("Week%201.mp4")
        );
    }
}
