//! Blocking HTTP plumbing.
//!
//! `HttpClient` is the seam the session and downloader talk to; `CurlClient`
//! implements it over libcurl's easy interface. Non-2xx statuses come back
//! as data in `HttpResponse` so callers decide which ones are fatal.

mod cookies;
mod curl_client;
mod headers;

pub use cookies::CookieJar;
pub use curl_client::CurlClient;
pub use headers::ResponseHeaders;

use crate::error::Result;
use std::io::Write;

/// URL plus request headers for a single call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Netscape cookie-file lines; the client sends each one only where its
    /// domain and path match.
    pub cookies: Vec<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn cookie_line(mut self, line: impl Into<String>) -> Self {
        self.cookies.push(line.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first request header named `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    /// URL after redirects.
    pub effective_url: String,
    pub headers: ResponseHeaders,
    /// Empty for HEAD and for `download_to`.
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking HTTP operations used by the session and the downloader.
pub trait HttpClient {
    fn get(&self, req: &HttpRequest) -> Result<HttpResponse>;

    fn head(&self, req: &HttpRequest) -> Result<HttpResponse>;

    /// POST `form` as `application/x-www-form-urlencoded`.
    fn post_form(&self, req: &HttpRequest, form: &[(&str, &str)]) -> Result<HttpResponse>;

    /// GET that streams a 2xx body into `sink`. Bodies of other statuses are discarded.
    fn download_to(&self, req: &HttpRequest, sink: &mut dyn Write) -> Result<HttpResponse>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn get(&self, req: &HttpRequest) -> Result<HttpResponse> {
        (**self).get(req)
    }

    fn head(&self, req: &HttpRequest) -> Result<HttpResponse> {
        (**self).head(req)
    }

    fn post_form(&self, req: &HttpRequest, form: &[(&str, &str)]) -> Result<HttpResponse> {
        (**self).post_form(req, form)
    }

    fn download_to(&self, req: &HttpRequest, sink: &mut dyn Write) -> Result<HttpResponse> {
        (**self).download_to(req, sink)
    }
}

#[cfg(test)]
pub(crate) mod fake;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_keeps_header_order() {
        let req = HttpRequest::new("https://example.com/")
            .header("Cookie", "csrftoken=abc")
            .header("X-CSRFToken", "abc");
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.headers[0].0, "Cookie");
        assert_eq!(req.header_value("x-csrftoken"), Some("abc"));
        assert_eq!(req.header_value("referer"), None);
    }

    #[test]
    fn success_range() {
        let mut resp = HttpResponse {
            status: 204,
            effective_url: String::new(),
            headers: ResponseHeaders::default(),
            body: Vec::new(),
        };
        assert!(resp.is_success());
        resp.status = 302;
        assert!(!resp.is_success());
        resp.status = 403;
        assert!(!resp.is_success());
    }
}
