//! Error types for the presentation engine

use thiserror::Error;

/// Result type alias for presenter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or presenting a page
#[derive(Error, Debug)]
pub enum Error {
    /// The live fetch failed and the store has no entry for the section
    #[error("Content unavailable: {source_name} could not be fetched and no fallback exists")]
    ContentUnavailable {
        /// Filename (or URL) of the document that failed to load
        source_name: String,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// Transport-level failure (connection refused, timeout, bad body)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The companion launcher could not be reached or answered badly
    #[error("Launcher unreachable: {0}")]
    LaunchUnreachable(String),

    /// Failed to parse or render a page
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::HttpStatus {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            },
            None => Error::NetworkError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_unavailable_names_the_source() {
        let err = Error::ContentUnavailable { source_name: "plan.md".into() };
        assert!(err.to_string().contains("plan.md"));
    }
}
