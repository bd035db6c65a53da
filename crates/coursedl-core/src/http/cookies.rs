//! Session cookies handed to libcurl's cookie engine.
//!
//! The jar only holds name/value pairs and the host they belong to. Each
//! request carries them as Netscape cookie-file lines; libcurl decides per
//! request (and per redirect hop) whether the host and path match.

use super::HttpRequest;

/// Name/value cookies for one host and its subdomains, path `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieJar {
    domain: String,
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into().trim_start_matches('.').to_ascii_lowercase(),
            cookies: Vec::new(),
        }
    }

    /// Jar scoped to the host of `url`; `None` if the URL has no host.
    pub fn for_url(url: &str) -> Option<Self> {
        let parsed = url::Url::parse(url).ok()?;
        Some(Self::new(parsed.host_str()?))
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Adds or replaces a cookie.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn cookies(&self) -> &[(String, String)] {
        &self.cookies
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// One Netscape cookie-file line per cookie: subdomains included, path
    /// `/`, not secure-only, session lifetime.
    pub fn netscape_lines(&self) -> Vec<String> {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}\tTRUE\t/\tFALSE\t0\t{}\t{}", self.domain, name, value))
            .collect()
    }

    /// GET/HEAD request for `url` carrying the jar.
    pub fn request(&self, url: &str) -> HttpRequest {
        self.netscape_lines()
            .into_iter()
            .fold(HttpRequest::new(url), |req, line| req.cookie_line(line))
    }
}
