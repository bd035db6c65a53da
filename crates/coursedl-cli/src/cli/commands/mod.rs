//! CLI command handlers. Each command is in its own file.

mod account;
mod download;
mod list;

pub use account::{normalize_extensions, remembered_config, resolve_account, Account};
pub use download::run_download;
pub use list::run_list;
