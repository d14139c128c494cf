//! Tracing setup for the `mdimg` binary.
//!
//! Events go to `$XDG_STATE_HOME/mdimg/mdimg.log` when that file can be
//! opened, otherwise to stderr. Stdout is reserved for progress lines.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "mdimg.log";

/// Used when `RUST_LOG` is unset or unparsable.
const DEFAULT_DIRECTIVES: &str = "info,mdimg=debug,mdimg_core=debug";

/// Where log output ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Opens (creating if needed) `dir/mdimg.log` for appending.
pub fn open_log_file(dir: &Path) -> Result<(PathBuf, File)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    Ok((path, file))
}

fn state_dir() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("mdimg")?;
    Ok(dirs.get_state_home())
}

/// Installs the global subscriber, preferring the XDG log file.
///
/// Never fails: if the file cannot be opened the subscriber writes to stderr
/// and the reason is logged there. Calling it twice keeps the first subscriber.
pub fn init() -> LogTarget {
    let opened = state_dir().and_then(|dir| open_log_file(&dir));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false);

    match opened {
        Ok((path, file)) => {
            // `Mutex<File>` serializes writes from concurrent events.
            let _ = builder.with_writer(Mutex::new(file)).try_init();
            tracing::info!("mdimg logging initialized at {}", path.display());
            LogTarget::File(path)
        }
        Err(err) => {
            let _ = builder.with_writer(std::io::stderr).try_init();
            tracing::warn!("file logging unavailable, using stderr: {:#}", err);
            LogTarget::Stderr
        }
    }
}
