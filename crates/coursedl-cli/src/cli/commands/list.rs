//! `coursedl --list-only`: print the scraped resource links.

use anyhow::{Context, Result};
use coursedl_core::config::CourseDlConfig;
use coursedl_core::http::CurlClient;
use coursedl_core::session::Session;

use super::Account;

/// `on_login` runs once the lecture index has loaded.
pub fn run_list(
    cfg: &CourseDlConfig,
    account: Account,
    on_login: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let mut session = Session::new(
        CurlClient::new(),
        cfg.endpoints.clone(),
        account.credentials,
        account.course,
    );
    let links = session
        .resource_links()
        .with_context(|| format!("listing resources for {}", session.course()))?;
    on_login()?;
    if links.is_empty() {
        println!("No resource links found.");
    }
    for link in links {
        println!("{}", link);
    }
    Ok(())
}
