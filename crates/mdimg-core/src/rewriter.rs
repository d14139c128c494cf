//! Per-file find-download-rewrite pass.
//!
//! Each image reference is swapped for a link into the images directory.
//! Remote images are fetched; relative references to files next to the
//! document are copied. The file is written back once, after every reference
//! has been handled, so a failed download leaves the Markdown file exactly as
//! it was.
//!
//! Documents are handled as bytes: only the URL spans change, everything else
//! is copied through verbatim whatever its encoding.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::MdimgConfig;
use crate::fetch::{temp_path, Fetcher};
use crate::links::image_refs;
use crate::url_model::{link_text, local_image_name, ImageSource};

/// Something that happened to a single image reference.
///
/// `matched` is the full `![alt](url)` text, lossily decoded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteEvent<'a> {
    /// The image was fetched into `dest`. `url` is the encoded request URL.
    Downloaded {
        url: &'a str,
        dest: &'a Path,
        bytes: u64,
    },
    /// A local image was copied into `dest`.
    Copied {
        source: &'a Path,
        dest: &'a Path,
        bytes: u64,
    },
    /// Dry run: the image would be fetched into `dest`.
    WouldDownload { url: &'a str, dest: &'a Path },
    /// Dry run: the local image would be copied into `dest`.
    WouldCopy { source: &'a Path, dest: &'a Path },
    /// `dest` is already on disk; nothing fetched or copied.
    AlreadyExists { matched: &'a str, dest: &'a Path },
    /// Relative reference to a file that does not exist; left as is.
    MissingLocal { matched: &'a str, source: &'a Path },
    /// No local filename can be derived from the URL; the reference is left as is.
    Unresolvable { matched: &'a str },
}

/// Counters for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Image references found.
    pub references: usize,
    /// References whose URL was replaced.
    pub rewritten: usize,
    /// Images fetched (or that would be fetched in a dry run).
    pub downloaded: usize,
    /// Local images copied (or that would be copied in a dry run).
    pub copied: usize,
    /// Images skipped because the destination existed.
    pub skipped: usize,
    /// References left untouched, including missing local files.
    pub unresolvable: usize,
}

/// Rewritten document bytes plus what happened while producing them.
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub text: Vec<u8>,
    pub stats: RewriteStats,
}

/// Outcome of [`rewrite_file`].
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub stats: RewriteStats,
    /// True if the Markdown file was overwritten.
    pub written: bool,
}

/// Maps image references to local files and fetches or copies the missing ones.
pub struct Localizer<F> {
    fetcher: F,
    /// Where image files live on disk.
    images_path: PathBuf,
    /// Directory prefix written into rewritten links.
    link_dir: PathBuf,
    create_dir: bool,
    dry_run: bool,
}

impl<F: Fetcher> Localizer<F> {
    /// `images_path` is the on-disk directory; `link_dir` is the prefix used in links.
    pub fn new(fetcher: F, images_path: impl Into<PathBuf>, link_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            images_path: images_path.into(),
            link_dir: link_dir.into(),
            create_dir: true,
            dry_run: false,
        }
    }

    pub fn from_config(cfg: &MdimgConfig, fetcher: F) -> Self {
        Self::new(fetcher, cfg.images_path(), cfg.images_dir.clone())
            .create_dir(cfg.create_images_dir)
    }

    /// Create the images directory before the first fetch when missing.
    pub fn create_dir(mut self, yes: bool) -> Self {
        self.create_dir = yes;
        self
    }

    /// Report what would happen without fetching or writing anything.
    pub fn dry_run(mut self, yes: bool) -> Self {
        self.dry_run = yes;
        self
    }

    pub fn images_path(&self) -> &Path {
        &self.images_path
    }

    fn ensure_images_dir(&self) -> Result<()> {
        if self.create_dir && !self.images_path.is_dir() {
            fs::create_dir_all(&self.images_path).with_context(|| {
                format!("cannot create images directory {}", self.images_path.display())
            })?;
            tracing::info!("created images directory {}", self.images_path.display());
        }
        Ok(())
    }

    fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        self.ensure_images_dir()?;
        let bytes = self
            .fetcher
            .fetch(url, dest)
            .with_context(|| format!("failed to download {}", url))?;
        Ok(bytes)
    }

    /// Copies through `<dest>.part` like a fetch, so an interrupted copy is
    /// never mistaken for an existing image.
    fn copy_local(&self, source: &Path, dest: &Path) -> Result<u64> {
        self.ensure_images_dir()?;
        let part = temp_path(dest);
        let bytes = fs::copy(source, &part)
            .and_then(|n| fs::rename(&part, dest).map(|()| n))
            .map_err(|e| {
                let _ = fs::remove_file(&part);
                e
            })
            .with_context(|| format!("failed to copy {} to {}", source.display(), dest.display()))?;
        tracing::info!(source = %source.display(), dest = %dest.display(), bytes, "copied image");
        Ok(bytes)
    }
}

/// Rewrites every image reference in `text`, fetching or copying images that
/// are not on disk yet. Relative references are resolved against `base_dir`.
///
/// The first failed fetch or copy aborts with an error and no text is returned.
pub fn rewrite_bytes<F: Fetcher>(
    text: &[u8],
    base_dir: &Path,
    localizer: &Localizer<F>,
    mut on_event: impl FnMut(RewriteEvent<'_>),
) -> Result<Rewritten> {
    let mut out = Vec::with_capacity(text.len());
    let mut cursor = 0;
    let mut stats = RewriteStats::default();
    // Dry runs never create files, so collisions inside one document are tracked here.
    let mut planned: HashSet<PathBuf> = HashSet::new();

    for r in image_refs(text) {
        stats.references += 1;
        let matched = String::from_utf8_lossy(r.matched(text));
        let matched: &str = &matched;

        let resolved = r
            .url_str(text)
            .and_then(|url| Some((local_image_name(url)?, ImageSource::parse(url)?)));
        let Some((name, source)) = resolved else {
            tracing::warn!("no usable file name in {:?}, leaving it alone", matched);
            stats.unresolvable += 1;
            on_event(RewriteEvent::Unresolvable { matched });
            continue;
        };
        let dest = localizer.images_path.join(&name);

        if dest.exists() || planned.contains(&dest) {
            tracing::debug!("{} already exists, skipping {}", dest.display(), matched);
            stats.skipped += 1;
            on_event(RewriteEvent::AlreadyExists {
                matched,
                dest: &dest,
            });
        } else {
            match source.resolve(base_dir) {
                ImageSource::Remote(url) => {
                    if localizer.dry_run {
                        on_event(RewriteEvent::WouldDownload {
                            url: url.as_str(),
                            dest: &dest,
                        });
                        planned.insert(dest.clone());
                    } else {
                        let bytes = localizer.fetch(url.as_str(), &dest)?;
                        on_event(RewriteEvent::Downloaded {
                            url: url.as_str(),
                            dest: &dest,
                            bytes,
                        });
                    }
                    stats.downloaded += 1;
                }
                ImageSource::Local(path) if !path.is_file() => {
                    tracing::warn!("{} not found, leaving {:?} alone", path.display(), matched);
                    stats.unresolvable += 1;
                    on_event(RewriteEvent::MissingLocal {
                        matched,
                        source: &path,
                    });
                    continue;
                }
                ImageSource::Local(path) => {
                    if localizer.dry_run {
                        on_event(RewriteEvent::WouldCopy {
                            source: &path,
                            dest: &dest,
                        });
                        planned.insert(dest.clone());
                    } else {
                        let bytes = localizer.copy_local(&path, &dest)?;
                        on_event(RewriteEvent::Copied {
                            source: &path,
                            dest: &dest,
                            bytes,
                        });
                    }
                    stats.copied += 1;
                }
            }
        }

        out.extend_from_slice(&text[cursor..r.url.start]);
        out.extend_from_slice(link_text(&localizer.link_dir, &name).as_bytes());
        cursor = r.url.end;
        stats.rewritten += 1;
    }
    out.extend_from_slice(&text[cursor..]);

    Ok(Rewritten { text: out, stats })
}

/// Processes one Markdown file in place.
///
/// The file is overwritten only if at least one reference was rewritten and
/// this is not a dry run; otherwise it is left byte-for-byte untouched.
pub fn rewrite_file<F: Fetcher>(
    path: &Path,
    localizer: &Localizer<F>,
    on_event: impl FnMut(RewriteEvent<'_>),
) -> Result<FileReport> {
    let text =
        fs::read(path).with_context(|| format!("cannot read markdown file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or(Path::new(""));

    let rewritten = rewrite_bytes(&text, base_dir, localizer, on_event)
        .with_context(|| format!("while processing {}", path.display()))?;

    let written = rewritten.stats.rewritten > 0 && !localizer.dry_run;
    if written {
        fs::write(path, &rewritten.text)
            .with_context(|| format!("cannot write markdown file {}", path.display()))?;
        tracing::info!(
            "rewrote {} ({} reference(s), {} downloaded, {} copied)",
            path.display(),
            rewritten.stats.rewritten,
            rewritten.stats.downloaded,
            rewritten.stats.copied
        );
    }

    Ok(FileReport {
        path: path.to_path_buf(),
        stats: rewritten.stats,
        written,
    })
}
