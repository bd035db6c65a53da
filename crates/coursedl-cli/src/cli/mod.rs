//! CLI for coursedl.

mod commands;
mod prompt;

use anyhow::Result;
use clap::Parser;
use coursedl_core::config;
use std::path::PathBuf;

use commands::{remembered_config, resolve_account, run_download, run_list};
use prompt::TerminalPrompter;

/// Top-level CLI: log in, scrape the lecture index, download resources.
#[derive(Debug, Parser)]
#[command(name = "coursedl")]
#[command(about = "coursedl: download lecture resources from a course site", long_about = None)]
pub struct Cli {
    /// Course identifier from the class URL (e.g. `ml-003` for https://class.coursera.org/ml-003/class).
    #[arg(long, short = 'c')]
    pub course: Option<String>,

    /// Account email.
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Account password. Prompted with hidden input when unset.
    #[arg(long, env = "COURSEDL_PASSWORD", hide = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Destination folder (must exist). Defaults to the configured folder, then the current directory.
    #[arg(long, short = 'd', value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Extension to download, repeatable (e.g. `--ext .mp4 --ext pdf`). Replaces the configured list.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Save the course identifier and username to the config file.
    #[arg(long)]
    pub remember: bool,

    /// Print the scraped resource links and exit without downloading.
    #[arg(long)]
    pub list_only: bool,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let mut prompter = TerminalPrompter;
        let account = resolve_account(&cli, &cfg, &mut prompter)?;

        // Saved only after login and the lecture index succeed.
        let remembered = cli.remember.then(|| remembered_config(&cfg, &account));
        let on_login = move || -> Result<()> {
            if let Some(saved) = remembered {
                config::save(&saved)?;
                tracing::info!(course = ?saved.course, "remembered course in config");
            }
            Ok(())
        };

        if cli.list_only {
            run_list(&cfg, account, on_login)
        } else {
            run_download(&cli, &cfg, account, on_login)
        }
    }
}

#[cfg(test)]
mod tests;
