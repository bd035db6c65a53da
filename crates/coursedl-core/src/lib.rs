pub mod config;
pub mod error;
pub mod logging;

pub mod download;
pub mod filename;
pub mod http;
pub mod session;

pub use error::{Error, Result};
