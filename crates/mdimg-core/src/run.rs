//! Whole-directory pass: scan, then rewrite each Markdown file in order.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::MdimgConfig;
use crate::fetch::Fetcher;
use crate::links::image_refs;
use crate::rewriter::{rewrite_file, FileReport, Localizer, RewriteEvent};
use crate::scanner::scan_with_extension;
use crate::url_model::local_image_name;

/// Progress notifications for a run, in the order they happen.
#[derive(Debug)]
pub enum RunEvent<'a> {
    FileStarted(&'a Path),
    Image(RewriteEvent<'a>),
    FileFinished(&'a FileReport),
}

/// Totals over every processed file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub files_written: usize,
    pub references: usize,
    pub downloaded: usize,
    pub copied: usize,
    pub skipped: usize,
    pub unresolvable: usize,
}

impl RunSummary {
    fn add(&mut self, report: &FileReport) {
        self.files += 1;
        if report.written {
            self.files_written += 1;
        }
        self.references += report.stats.references;
        self.downloaded += report.stats.downloaded;
        self.copied += report.stats.copied;
        self.skipped += report.stats.skipped;
        self.unresolvable += report.stats.unresolvable;
    }
}

/// Processes every Markdown file in `cfg.input_dir`, one at a time.
///
/// Stops at the first error. Files finished before it keep their rewritten
/// content; the failing file is left unmodified.
pub fn run<F: Fetcher>(
    cfg: &MdimgConfig,
    fetcher: F,
    dry_run: bool,
    mut on_event: impl FnMut(RunEvent<'_>),
) -> Result<RunSummary> {
    let localizer = Localizer::from_config(cfg, fetcher).dry_run(dry_run);
    let files = scan_with_extension(&cfg.input_dir, &cfg.markdown_extension)?;
    tracing::info!(
        "processing {} file(s) in {} (images -> {}{})",
        files.len(),
        cfg.input_dir.display(),
        localizer.images_path().display(),
        if dry_run { ", dry run" } else { "" }
    );

    let mut summary = RunSummary::default();
    for path in &files {
        on_event(RunEvent::FileStarted(path));
        let report = rewrite_file(path, &localizer, |ev| on_event(RunEvent::Image(ev)))?;
        on_event(RunEvent::FileFinished(&report));
        summary.add(&report);
    }

    tracing::info!(
        "done: {} file(s), {} rewritten, {} downloaded, {} copied, {} already present",
        summary.files,
        summary.files_written,
        summary.downloaded,
        summary.copied,
        summary.skipped
    );
    Ok(summary)
}

/// One image reference as seen by [`inspect`].
#[derive(Debug, Clone, Serialize)]
pub struct InspectedRef {
    pub matched: String,
    pub alt: String,
    pub url: String,
    /// File name the image would be saved under, if any.
    pub local_name: Option<String>,
    /// True if that file already exists in the images directory.
    pub exists: bool,
}

/// Markdown file with the image references it contains.
#[derive(Debug, Clone, Serialize)]
pub struct InspectedFile {
    pub path: PathBuf,
    pub images: Vec<InspectedRef>,
}

/// Lists Markdown files and their image references without fetching or writing.
pub fn inspect(cfg: &MdimgConfig) -> Result<Vec<InspectedFile>> {
    let images_path = cfg.images_path();
    let files = scan_with_extension(&cfg.input_dir, &cfg.markdown_extension)?;
    let mut out = Vec::with_capacity(files.len());
    for path in files {
        let text = std::fs::read(&path)
            .with_context(|| format!("cannot read markdown file {}", path.display()))?;
        let images = image_refs(&text)
            .map(|r| {
                let local_name = r.url_str(&text).and_then(local_image_name);
                let exists = local_name
                    .as_ref()
                    .map(|n| images_path.join(n).exists())
                    .unwrap_or(false);
                InspectedRef {
                    matched: String::from_utf8_lossy(r.matched(&text)).into_owned(),
                    alt: String::from_utf8_lossy(r.alt_bytes(&text)).into_owned(),
                    url: String::from_utf8_lossy(r.url_bytes(&text)).into_owned(),
                    local_name,
                    exists,
                }
            })
            .collect();
        out.push(InspectedFile { path, images });
    }
    Ok(out)
}
