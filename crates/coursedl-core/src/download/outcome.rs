//! Per-link results of a download run.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Not a syntactically valid URI; skipped without any request.
    InvalidLink { link: String },
    /// Extension not in the allow-list; no content fetched.
    Filtered { link: String, filename: String },
    /// Destination already on disk; left untouched.
    AlreadyExists { link: String, filename: String },
    Downloaded {
        link: String,
        filename: String,
        bytes: u64,
    },
    /// Content GET answered 403; the run continued.
    Forbidden { link: String, filename: String },
}

impl LinkOutcome {
    pub fn link(&self) -> &str {
        match self {
            LinkOutcome::InvalidLink { link }
            | LinkOutcome::Filtered { link, .. }
            | LinkOutcome::AlreadyExists { link, .. }
            | LinkOutcome::Downloaded { link, .. }
            | LinkOutcome::Forbidden { link, .. } => link,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            LinkOutcome::InvalidLink { .. } => None,
            LinkOutcome::Filtered { filename, .. }
            | LinkOutcome::AlreadyExists { filename, .. }
            | LinkOutcome::Downloaded { filename, .. }
            | LinkOutcome::Forbidden { filename, .. } => Some(filename),
        }
    }
}

impl fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkOutcome::InvalidLink { link } => write!(f, "'{}' is not a valid link. Skipping.", link),
            LinkOutcome::Filtered { filename, .. } => {
                write!(f, "{} has an unwanted extension. Skipping.", filename)
            }
            LinkOutcome::AlreadyExists { filename, .. } => {
                write!(f, "{} already exists. Skipping.", filename)
            }
            LinkOutcome::Downloaded { filename, bytes, .. } => {
                write!(f, "Finished {} ({} bytes).", filename, bytes)
            }
            LinkOutcome::Forbidden { link, filename } => {
                write!(f, "Failed to download {} from {}: access forbidden (HTTP 403)", filename, link)
            }
        }
    }
}

/// Progress notifications emitted while the run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    /// The HEAD for `link` answered 403; `filename` was taken from that
    /// response (or the URL) instead.
    NameFromForbidden { link: &'a str, filename: &'a str },
    /// About to GET `link` into `filename`.
    Fetching { link: &'a str, filename: &'a str },
    Done(&'a LinkOutcome),
}

/// All outcomes of a run, in link order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub outcomes: Vec<LinkOutcome>,
}

impl DownloadReport {
    fn count(&self, pred: impl Fn(&LinkOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Downloaded { .. }))
    }

    pub fn already_existing(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::AlreadyExists { .. }))
    }

    pub fn forbidden(&self) -> usize {
        self.count(|o| matches!(o, LinkOutcome::Forbidden { .. }))
    }

    /// Filtered by extension or rejected as invalid links.
    pub fn ignored(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                LinkOutcome::Filtered { .. } | LinkOutcome::InvalidLink { .. }
            )
        })
    }

    pub fn total_bytes(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|o| match o {
                LinkOutcome::Downloaded { bytes, .. } => *bytes,
                _ => 0,
            })
            .sum()
    }
}
