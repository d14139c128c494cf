//! Fetch error type.

use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a single image fetch (curl failure, HTTP error, or disk failure).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (bad URL, DNS, connection, timeout, ...).
    #[error("fetching {url}: {source}")]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// HTTP response had a non-2xx status.
    #[error("GET {url} returned HTTP {code}")]
    Http { url: String, code: u32 },
    /// Writing the image to disk failed.
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http() {
        let e = FetchError::Http {
            url: "http://x/a.png".to_string(),
            code: 404,
        };
        assert_eq!(e.to_string(), "GET http://x/a.png returned HTTP 404");
    }

    #[test]
    fn io_keeps_source() {
        let e = FetchError::io(
            "/nope/a.png.part",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(e.to_string().starts_with("writing /nope/a.png.part"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
