//! Where an image reference points: a remote URL or a file next to the document.

use super::path::{decode, strip_query};
use std::path::{Path, PathBuf};
use url::Url;

/// Resolved origin of an image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Absolute URL with a path, normalized and percent-encoded by the `url`
    /// crate. This is what goes on the wire.
    Remote(Url),
    /// Relative (or absolute filesystem) path, percent-decoded and not yet
    /// joined to the document's directory.
    Local(PathBuf),
}

impl ImageSource {
    /// Classifies `reference`. Returns `None` for references that name
    /// nothing fetchable: empty text and opaque URLs such as `data:` or
    /// `mailto:`.
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        match Url::parse(reference) {
            Ok(url) if url.cannot_be_a_base() => None,
            Ok(url) => Some(Self::Remote(url)),
            Err(_) => {
                let path = strip_query(reference);
                if path.is_empty() {
                    return None;
                }
                Some(Self::Local(PathBuf::from(decode(path).as_ref())))
            }
        }
    }

    /// Local paths are resolved against `base_dir` (the Markdown file's
    /// directory); remote sources are returned unchanged.
    pub fn resolve(self, base_dir: &Path) -> Self {
        match self {
            Self::Local(path) => Self::Local(base_dir.join(path)),
            remote => remote,
        }
    }
}
