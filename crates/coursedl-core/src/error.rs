//! Error taxonomy shared by the session and the downloader.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Course root unreachable or it returned no session cookie.
    #[error("unable to connect to course: {0}")]
    Connection(String),

    /// Login POST went through but no auth cookie came back.
    #[error("unable to complete login: {0}")]
    Login(String),

    /// Lecture index returned no body.
    #[error("unable to load course content from {0}")]
    ContentLoad(String),

    #[error("invalid destination folder: {}", .0.display())]
    InvalidDestination(std::path::PathBuf),

    /// HTTP 403 on a resource link. Recovered per link by the downloader.
    #[error("access forbidden (HTTP 403): {url}")]
    Forbidden { url: String },

    /// Any other non-2xx status. Fatal for the run.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    #[error("transport: {0}")]
    Transport(#[from] curl::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Maps a non-2xx response status to `Forbidden` or `HttpStatus`.
    pub fn from_status(url: &str, status: u32) -> Self {
        if status == 403 {
            Error::Forbidden {
                url: url.to_string(),
            }
        } else {
            Error::HttpStatus {
                url: url.to_string(),
                status,
            }
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Error::Forbidden { .. })
    }
}
