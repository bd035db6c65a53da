//! Course session: CSRF token, login, auth cookies and lecture scraping.
//!
//! Every step is computed on first access and cached for the lifetime of
//! the session:
//!
//! `Unauthenticated -> CsrfReady -> Authenticated`
//!
//! Credentials are dropped as soon as the login POST yields the `CAUTH`
//! cookie. Resource links are never cached; each call re-scrapes the page.

mod scrape;

pub use scrape::{extract_resource_links, RESOURCE_ITEM_SELECTOR};

use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpRequest};
use regex::Regex;
use std::fmt;

/// Name of the authenticated-session cookie.
pub const CAUTH: &str = "CAUTH";

/// Links with this prefix point at forum threads, not downloadable resources.
pub const FORUM_PREFIX: &str = "forum:";

/// Account email and password. Debug output never shows the password.
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    CsrfReady,
    Authenticated,
}

/// Extracts `key=value` from a cookie header string (value stops at `;`).
pub fn parse_cookie_value(key: &str, cookies: &str) -> Option<String> {
    let re = Regex::new(&format!("{}=([^;]+)", regex::escape(key))).ok()?;
    re.captures(cookies)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub struct Session<C: HttpClient> {
    client: C,
    endpoints: Endpoints,
    course: String,
    credentials: Option<Credentials>,
    csrf_token: Option<String>,
    cauth: Option<String>,
    cookies: Option<Vec<(String, String)>>,
}

impl<C: HttpClient> Session<C> {
    pub fn new(
        client: C,
        endpoints: Endpoints,
        credentials: Credentials,
        course: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoints,
            course: course.into(),
            credentials: Some(credentials),
            csrf_token: None,
            cauth: None,
            cookies: None,
        }
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn course_uri(&self) -> String {
        self.endpoints.course_uri(&self.course)
    }

    pub fn course_content_uri(&self) -> String {
        self.endpoints.course_content_uri(&self.course)
    }

    pub fn state(&self) -> SessionState {
        if self.cauth.is_some() {
            SessionState::Authenticated
        } else if self.csrf_token.is_some() {
            SessionState::CsrfReady
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// CSRF token from the first `Set-Cookie` of the course root page.
    pub fn csrf_token(&mut self) -> Result<&str> {
        if self.csrf_token.is_none() {
            let uri = self.course_uri();
            let resp = self
                .client
                .get(&HttpRequest::new(&uri))
                .map_err(|e| Error::Connection(format!("{}: {}", uri, e)))?;
            let first = resp
                .headers
                .set_cookies()
                .first()
                .map(|s| s.to_string())
                .ok_or_else(|| Error::Connection(format!("no session cookie from {}", uri)))?;
            let token = first
                .split(';')
                .next()
                .and_then(|pair| pair.split('=').nth(1))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| Error::Connection(format!("malformed session cookie from {}", uri)))?;
            tracing::info!(course = %self.course, "csrf token acquired");
            self.csrf_token = Some(token.to_string());
        }
        Ok(self.csrf_token.as_deref().unwrap_or_default())
    }

    /// Logs in and returns the `CAUTH` cookie value.
    pub fn auth_cookie(&mut self) -> Result<&str> {
        if self.cauth.is_none() {
            let token = self.csrf_token()?.to_string();
            let creds = self
                .credentials
                .as_ref()
                .ok_or_else(|| Error::Login("credentials already consumed".to_string()))?;

            let req = HttpRequest::new(&self.endpoints.login_url)
                .header("Cookie", format!("csrftoken={}", token))
                .header("X-CSRFToken", token.as_str())
                .header("Referer", self.endpoints.signin_referer.as_str());
            let form = [
                ("email", creds.username.as_str()),
                ("password", creds.password.as_str()),
            ];
            let resp = self.client.post_form(&req, &form)?;

            let set_cookies = resp.headers.set_cookies();
            if set_cookies.is_empty() {
                return Err(Error::Login(format!(
                    "no cookies returned (HTTP {})",
                    resp.status
                )));
            }
            let joined = set_cookies.join(", ");
            let cauth = parse_cookie_value(CAUTH, &joined)
                .ok_or_else(|| Error::Login(format!("no {} cookie returned", CAUTH)))?;

            self.credentials = None;
            self.cauth = Some(cauth);
            tracing::info!(course = %self.course, "logged in");
        }
        Ok(self.cauth.as_deref().unwrap_or_default())
    }

    /// `{login flag: 1, CAUTH: <value>}`, computed once.
    pub fn cookies(&mut self) -> Result<&[(String, String)]> {
        if self.cookies.is_none() {
            let cauth = self.auth_cookie()?.to_string();
            self.cookies = Some(vec![
                (self.endpoints.login_flag_cookie.clone(), "1".to_string()),
                (CAUTH.to_string(), cauth),
            ]);
        }
        Ok(self.cookies.as_deref().unwrap_or_default())
    }

    /// Cookie map as a `Cookie` header value (`a=1;b=2`).
    pub fn cookie_string(&mut self) -> Result<String> {
        Ok(self
            .cookies()?
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(";"))
    }

    /// Scrapes the lecture index for resource links, minus forum links. Not cached.
    pub fn resource_links(&mut self) -> Result<Vec<String>> {
        let cookie = self.cookie_string()?;
        let uri = self.course_content_uri();
        let resp = self
            .client
            .get(&HttpRequest::new(&uri).header("Cookie", cookie))?;
        if resp.body.is_empty() {
            return Err(Error::ContentLoad(uri));
        }
        let mut links = extract_resource_links(&resp.text());
        links.retain(|link| !link.starts_with(FORUM_PREFIX));
        tracing::info!(course = %self.course, count = links.len(), "scraped resource links");
        Ok(links)
    }
}

impl<C: HttpClient> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("course", &self.course)
            .field("state", &self.state())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
