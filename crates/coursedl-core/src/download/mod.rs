//! Sequential resource downloader.
//!
//! For each scraped link: resolve and sanitize the filename, apply the
//! extension filter, skip files already on disk, then GET the content into a
//! `.part` file and rename it into place. A 403 on the content GET is
//! recorded and the run moves on; any other HTTP failure aborts the run.

mod outcome;
mod part;

pub use outcome::{DownloadReport, LinkOutcome, Progress};
pub use part::{temp_path, PartFile, TEMP_SUFFIX};

use crate::config::CourseDlConfig;
use crate::error::{Error, Result};
use crate::filename::{has_allowed_extension, FilenameResolver};
use crate::http::{CookieJar, HttpClient};
use std::path::{Path, PathBuf};

/// Destination, extension allow-list and filename rules for a run.
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub dest_dir: PathBuf,
    pub extensions: Vec<String>,
    pub resolver: FilenameResolver,
}

impl DownloadOptions {
    /// Defaults: built-in extensions and substitution table.
    pub fn new(dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            extensions: crate::config::default_extensions(),
            resolver: FilenameResolver::default(),
        }
    }

    /// Options from config; `dest_dir` overrides the configured folder.
    pub fn from_config(cfg: &CourseDlConfig, dest_dir: Option<PathBuf>) -> Result<Self> {
        let dest_dir = match dest_dir.or_else(|| cfg.dest_dir.clone()) {
            Some(d) => d,
            None => std::env::current_dir()?,
        };
        Ok(Self {
            dest_dir,
            extensions: cfg.extensions.clone(),
            resolver: FilenameResolver::with_overrides(&cfg.filename_subs),
        })
    }
}

pub struct Downloader<C: HttpClient> {
    client: C,
    jar: CookieJar,
    links: Vec<String>,
    options: DownloadOptions,
}

impl<C: HttpClient> Downloader<C> {
    /// Fails with `InvalidDestination` unless `options.dest_dir` is an existing directory.
    pub fn new(
        client: C,
        jar: CookieJar,
        links: Vec<String>,
        options: DownloadOptions,
    ) -> Result<Self> {
        if !options.dest_dir.is_dir() {
            return Err(Error::InvalidDestination(options.dest_dir));
        }
        Ok(Self {
            client,
            jar,
            links,
            options,
        })
    }

    pub fn dest_dir(&self) -> &Path {
        &self.options.dest_dir
    }

    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn download(&self) -> Result<DownloadReport> {
        self.download_with(|_| {})
    }

    /// Runs every link in order, reporting progress through `on_progress`.
    pub fn download_with<F>(&self, mut on_progress: F) -> Result<DownloadReport>
    where
        F: FnMut(Progress<'_>),
    {
        let mut report = DownloadReport::default();
        for link in &self.links {
            let outcome = self.process(link, &mut on_progress)?;
            on_progress(Progress::Done(&outcome));
            report.outcomes.push(outcome);
        }
        tracing::info!(
            downloaded = report.downloaded(),
            existing = report.already_existing(),
            forbidden = report.forbidden(),
            "download run finished"
        );
        Ok(report)
    }

    fn process<F>(&self, link: &str, on_progress: &mut F) -> Result<LinkOutcome>
    where
        F: FnMut(Progress<'_>),
    {
        if url::Url::parse(link).is_err() {
            tracing::debug!(link, "not a valid URI; skipping");
            return Ok(LinkOutcome::InvalidLink {
                link: link.to_string(),
            });
        }

        let remote = self.options.resolver.resolve(&self.client, link, &self.jar)?;
        if remote.head_forbidden {
            on_progress(Progress::NameFromForbidden {
                link,
                filename: &remote.name,
            });
        }
        let filename = self.options.resolver.sanitize(&remote.name);

        if !has_allowed_extension(&filename, &self.options.extensions) {
            tracing::debug!(link, %filename, "extension not allowed; skipping");
            return Ok(LinkOutcome::Filtered {
                link: link.to_string(),
                filename,
            });
        }

        let destination = self.options.dest_dir.join(&filename);
        if destination.exists() {
            tracing::info!(%filename, "already exists; skipping");
            return Ok(LinkOutcome::AlreadyExists {
                link: link.to_string(),
                filename,
            });
        }

        on_progress(Progress::Fetching {
            link,
            filename: &filename,
        });
        self.fetch(link, filename, &destination)
    }

    fn fetch(&self, link: &str, filename: String, destination: &Path) -> Result<LinkOutcome> {
        let mut part = PartFile::create(destination)?;
        let resp = self.client.download_to(&self.jar.request(link), &mut part)?;

        if resp.status == 403 {
            tracing::warn!(link, %filename, "content forbidden; continuing");
            return Ok(LinkOutcome::Forbidden {
                link: link.to_string(),
                filename,
            });
        }
        if !resp.is_success() {
            return Err(Error::from_status(link, resp.status));
        }

        let bytes = part.finalize(destination)?;
        tracing::info!(%filename, bytes, "downloaded");
        Ok(LinkOutcome::Downloaded {
            link: link.to_string(),
            filename,
            bytes,
        })
    }
}
