//! `mdimg run` – download images and rewrite Markdown links.

use anyhow::Result;
use mdimg_core::config::MdimgConfig;
use mdimg_core::fetch::CurlFetcher;
use mdimg_core::rewriter::RewriteEvent;
use mdimg_core::run::{run, RunEvent};
use std::path::Path;

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Stdout text for one event, if it has any.
pub(crate) fn progress_line(ev: &RunEvent<'_>) -> Option<String> {
    match ev {
        RunEvent::FileStarted(path) => Some(display_name(path)),
        RunEvent::Image(RewriteEvent::AlreadyExists { matched, .. }) => {
            Some(format!("image already exists: {matched}"))
        }
        RunEvent::Image(RewriteEvent::MissingLocal { matched, .. }) => {
            Some(format!("image not found: {matched}"))
        }
        RunEvent::Image(RewriteEvent::WouldDownload { url, dest }) => {
            Some(format!("would download {} -> {}", url, dest.display()))
        }
        RunEvent::Image(RewriteEvent::WouldCopy { source, dest }) => Some(format!(
            "would copy {} -> {}",
            source.display(),
            dest.display()
        )),
        RunEvent::Image(RewriteEvent::Downloaded { .. })
        | RunEvent::Image(RewriteEvent::Copied { .. })
        | RunEvent::Image(RewriteEvent::Unresolvable { .. }) => None,
        RunEvent::FileFinished(_) => Some(String::new()),
    }
}

pub fn run_localize(cfg: &MdimgConfig, dry_run: bool) -> Result<()> {
    let fetcher = CurlFetcher::new(cfg.fetch_config());
    let summary = run(cfg, fetcher, dry_run, |ev| {
        if let Some(line) = progress_line(&ev) {
            println!("{line}");
        }
    })?;

    if dry_run {
        println!(
            "dry run: {} file(s), {} image(s) to download, {} to copy, {} already present",
            summary.files, summary.downloaded, summary.copied, summary.skipped
        );
    }
    Ok(())
}
