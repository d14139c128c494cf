//! Blocking single-GET fetcher built on libcurl.
//!
//! The body is streamed into `<dest>.part` and renamed to `dest` once the
//! transfer succeeds.

use super::{temp_path, FetchError, Fetcher};
use crate::config::FetchConfig;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Fetcher that performs one blocking HTTP(S) GET per image.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    cfg: FetchConfig,
}

impl CurlFetcher {
    pub fn new(cfg: FetchConfig) -> Self {
        Self { cfg }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.cfg.max_redirects)?;
        easy.connect_timeout(self.cfg.connect_timeout())?;
        if let Some(timeout) = self.cfg.timeout() {
            easy.timeout(timeout)?;
        }
        if let Some(ua) = &self.cfg.user_agent {
            easy.useragent(ua)?;
        }
        Ok(easy)
    }

    fn transfer_to(&self, url: &str, part: &Path) -> Result<u64, FetchError> {
        let curl_err = |source: curl::Error| FetchError::Curl {
            url: url.to_string(),
            source,
        };

        let mut easy = self.easy(url).map_err(curl_err)?;
        let mut file = fs::File::create(part).map_err(|e| FetchError::io(part, e))?;
        let mut written: u64 = 0;
        let mut write_err: Option<std::io::Error> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match file.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(curl_err)?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::io(part, e));
        }
        performed.map_err(curl_err)?;

        // Non-HTTP schemes (e.g. file://) report 0.
        let code = easy.response_code().map_err(curl_err)?;
        if code != 0 && !(200..300).contains(&code) {
            return Err(FetchError::Http {
                url: url.to_string(),
                code,
            });
        }

        file.flush().map_err(|e| FetchError::io(part, e))?;
        Ok(written)
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let part = temp_path(dest);
        tracing::debug!(url, dest = %dest.display(), "GET");

        match self.transfer_to(url, &part) {
            Ok(bytes) => {
                fs::rename(&part, dest).map_err(|e| FetchError::io(dest, e))?;
                tracing::info!(url, dest = %dest.display(), bytes, "downloaded image");
                Ok(bytes)
            }
            Err(e) => {
                if part.exists() {
                    if let Err(rm) = fs::remove_file(&part) {
                        tracing::warn!("failed to remove {}: {}", part.display(), rm);
                    }
                }
                tracing::warn!(url, "fetch failed: {}", e);
                Err(e)
            }
        }
    }
}
