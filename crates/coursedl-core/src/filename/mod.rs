//! Local filename derivation for remote resources.
//!
//! The name comes from the `Content-Disposition` of a HEAD response, or the
//! last path segment of the final URL, URL-decoded. It is then passed
//! through a configurable substitution table before use.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::{
    filename_from_pattern, parse_content_disposition_filename, percent_decode, strip_embedded_url,
};
pub use path::filename_from_url_path;
pub use sanitize::{apply_substitutions, default_substitutions, merge_substitutions};

use crate::error::{Error, Result};
use crate::http::{CookieJar, HttpClient, HttpResponse};
use std::collections::BTreeMap;

/// Default filename when neither the headers nor the URL yield anything usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Filename reported by the server for a link, before sanitizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteName {
    pub name: String,
    /// The HEAD answered 403 and the name was recovered from that response.
    pub head_forbidden: bool,
}

/// Resolves and sanitizes local filenames using ordered substitution rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameResolver {
    substitutions: Vec<(String, String)>,
}

impl Default for FilenameResolver {
    fn default() -> Self {
        Self::with_overrides(&BTreeMap::new())
    }
}

impl FilenameResolver {
    /// Resolver using exactly `substitutions`, in sorted key order.
    pub fn new(substitutions: BTreeMap<String, String>) -> Self {
        Self {
            substitutions: substitutions.into_iter().collect(),
        }
    }

    /// Default rules with `overrides` merged in; see [`merge_substitutions`].
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        Self {
            substitutions: merge_substitutions(&default_substitutions(), overrides),
        }
    }

    pub fn substitutions(&self) -> &[(String, String)] {
        &self.substitutions
    }

    /// Remote filename for `link`, before sanitizing.
    ///
    /// A 403 on the HEAD is not an error: the name is pattern-matched out of
    /// the forbidden response instead. Any other non-2xx status is returned
    /// as an error.
    pub fn resolve<C: HttpClient>(
        &self,
        client: &C,
        link: &str,
        jar: &CookieJar,
    ) -> Result<RemoteName> {
        let resp = client.head(&jar.request(link))?;
        let head_forbidden = resp.status == 403;

        let name = if head_forbidden {
            tracing::warn!(link, "HEAD forbidden; taking filename from response headers");
            forbidden_filename(&resp)
        } else if !resp.is_success() {
            return Err(Error::from_status(link, resp.status));
        } else if let Some(cd) = resp
            .headers
            .content_disposition()
            .and_then(parse_content_disposition_filename)
        {
            percent_decode(&strip_embedded_url(&cd))
        } else {
            url_filename(&resp.effective_url)
        };

        let name = if name.is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            name
        };
        Ok(RemoteName {
            name,
            head_forbidden,
        })
    }

    pub fn sanitize(&self, filename: &str) -> String {
        apply_substitutions(filename, &self.substitutions)
    }
}

fn url_filename(url: &str) -> String {
    filename_from_url_path(url)
        .map(|s| percent_decode(&s))
        .unwrap_or_default()
}

fn forbidden_filename(resp: &HttpResponse) -> String {
    let headers = resp
        .headers
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n");
    match filename_from_pattern(&headers) {
        Some(name) => percent_decode(&name),
        None => url_filename(&resp.effective_url),
    }
}

/// Extension of `filename` including the dot (`"a.tar.gz"` -> `".gz"`).
/// Dotfiles and names ending in `.` have none.
pub fn extension(filename: &str) -> Option<&str> {
    let idx = filename.rfind('.')?;
    if idx == 0 || idx + 1 == filename.len() {
        return None;
    }
    Some(&filename[idx..])
}

/// Exact, case-sensitive match of the extension against `allowed` (e.g. `[".mp4", ".pdf"]`).
pub fn has_allowed_extension<S: AsRef<str>>(filename: &str, allowed: &[S]) -> bool {
    match extension(filename) {
        Some(ext) => allowed.iter().any(|a| a.as_ref() == ext),
        None => false,
    }
}
