//! Gather course identifier and credentials from flags, config and prompts.

use anyhow::Result;
use coursedl_core::config::CourseDlConfig;
use coursedl_core::session::Credentials;

use crate::cli::prompt::{ask, Prompter};
use crate::cli::Cli;

const BANNER: &str = "------ coursedl: course resource downloader ------";

#[derive(Debug)]
pub struct Account {
    pub course: String,
    pub credentials: Credentials,
}

/// Flags win over config; anything still missing is prompted for.
pub fn resolve_account<P: Prompter + ?Sized>(
    cli: &Cli,
    cfg: &CourseDlConfig,
    prompter: &mut P,
) -> Result<Account> {
    let username = cli.username.clone().or_else(|| cfg.username.clone());
    let course = cli.course.clone().or_else(|| cfg.course.clone());

    if username.is_none() || cli.password.is_none() || course.is_none() {
        println!("{}", BANNER);
    }

    let username = match username {
        Some(u) => u,
        None => {
            println!("\nProvide the email and password you use to sign in to the course site.");
            ask(prompter, "Username: ", false)?
        }
    };
    let password = match cli.password.clone() {
        Some(p) => p,
        None => ask(prompter, "Password: ", true)?,
    };
    let course = match course {
        Some(c) => c,
        None => {
            println!(
                "\nProvide the URL name of the course. For example, if the class home page is \
                 'https://class.coursera.org/ml-003/class' answer 'ml-003'."
            );
            ask(prompter, "Course (URL) Name: ", false)?
        }
    };

    Ok(Account {
        course,
        credentials: Credentials::new(username, password),
    })
}

/// Copy of `cfg` with the account's course and username recorded.
pub fn remembered_config(cfg: &CourseDlConfig, account: &Account) -> CourseDlConfig {
    CourseDlConfig {
        course: Some(account.course.clone()),
        username: Some(account.credentials.username().to_string()),
        ..cfg.clone()
    }
}

/// Adds the leading dot where missing (`pdf` -> `.pdf`) and drops blanks.
pub fn normalize_extensions(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(|e| {
            if e.starts_with('.') {
                e.to_string()
            } else {
                format!(".{}", e)
            }
        })
        .collect()
}
