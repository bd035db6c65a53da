//! Default command: log in, scrape, download.

use anyhow::{Context, Result};
use coursedl_core::config::CourseDlConfig;
use coursedl_core::download::{DownloadOptions, Downloader, LinkOutcome, Progress};
use coursedl_core::http::{CookieJar, CurlClient};
use coursedl_core::session::Session;

use super::{normalize_extensions, Account};
use crate::cli::Cli;

/// `on_login` runs once the lecture index has loaded, before any download.
pub fn run_download(
    cli: &Cli,
    cfg: &CourseDlConfig,
    account: Account,
    on_login: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let mut options = DownloadOptions::from_config(cfg, cli.dest.clone())?;
    if !cli.extensions.is_empty() {
        options.extensions = normalize_extensions(&cli.extensions);
    }

    let client = CurlClient::new();
    let mut session = Session::new(
        &client,
        cfg.endpoints.clone(),
        account.credentials,
        account.course,
    );
    let links = session
        .resource_links()
        .with_context(|| format!("loading lecture index for {}", session.course()))?;
    on_login()?;
    tracing::debug!("session: {:?}", session);

    let course_uri = session.course_uri();
    let mut jar = CookieJar::for_url(&course_uri)
        .with_context(|| format!("course URL has no host: {}", course_uri))?;
    for (name, value) in session.cookies()? {
        jar.add(name.as_str(), value.as_str());
    }

    let downloader = Downloader::new(&client, jar, links, options)?;
    println!(
        "Downloading {} resource link(s) to {}",
        downloader.links().len(),
        downloader.dest_dir().display()
    );

    let report = downloader.download_with(print_progress)?;
    println!(
        "Done: {} downloaded, {} already present, {} forbidden, {} ignored ({} bytes).",
        report.downloaded(),
        report.already_existing(),
        report.forbidden(),
        report.ignored(),
        report.total_bytes()
    );
    Ok(())
}

fn print_progress(progress: Progress<'_>) {
    match progress {
        Progress::NameFromForbidden { link, filename } => {
            eprintln!(
                "Access to {} is forbidden (HTTP 403); using filename '{}'",
                link, filename
            );
        }
        Progress::Fetching { link, filename } => {
            println!("Downloading '{}' to '{}' ...", link, filename);
        }
        Progress::Done(outcome @ LinkOutcome::Forbidden { .. }) => eprintln!("{}", outcome),
        Progress::Done(outcome @ LinkOutcome::AlreadyExists { .. }) => println!("{}", outcome),
        Progress::Done(LinkOutcome::Downloaded { .. }) => println!("Finished."),
        Progress::Done(_) => {}
    }
}
