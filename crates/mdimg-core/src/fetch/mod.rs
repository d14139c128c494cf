//! Image fetching.
//!
//! The rewriter only depends on the [`Fetcher`] trait; [`CurlFetcher`] is the
//! libcurl-backed implementation used by the CLI.

mod http;
mod error;

pub use http::CurlFetcher;
pub use error::FetchError;

use std::path::{Path, PathBuf};

/// Temporary file suffix used while a download is in flight.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.png` → `a.png.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Downloads one URL to a local file.
pub trait Fetcher {
    /// Fetches `url` and stores the body at `dest`. Returns the number of bytes written.
    ///
    /// On error `dest` must not exist afterwards, so a later run retries the image.
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        (**self).fetch(url, dest)
    }
}
