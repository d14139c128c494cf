//! Inline Markdown image links: `![alt](url)`.
//!
//! Matching works on raw bytes so a document in any ASCII-compatible
//! encoding can be scanned. Offsets point into the original buffer, so
//! callers can splice replacements without re-slicing the remaining tail.

use regex::bytes::{CaptureMatches, Regex};
use std::ops::Range;
use std::sync::LazyLock;

/// `![`, alt text up to the first `]`, `(`, URL up to the first `)`, `)`.
/// Neither part crosses a line break. Unicode mode is off so the classes
/// match any byte, not just valid UTF-8.
static IMAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u)!\[([^\]\n]*)\]\(([^)\n]*)\)").expect("image link regex is valid")
});

/// One image reference found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Span of the whole `![alt](url)` text.
    pub span: Range<usize>,
    /// Span of the alt text inside the brackets.
    pub alt: Range<usize>,
    /// Span of the URL inside the parentheses.
    pub url: Range<usize>,
}

impl ImageRef {
    pub fn matched<'t>(&self, text: &'t [u8]) -> &'t [u8] {
        &text[self.span.clone()]
    }

    pub fn alt_bytes<'t>(&self, text: &'t [u8]) -> &'t [u8] {
        &text[self.alt.clone()]
    }

    pub fn url_bytes<'t>(&self, text: &'t [u8]) -> &'t [u8] {
        &text[self.url.clone()]
    }

    /// The URL as text, or `None` if it is not valid UTF-8.
    pub fn url_str<'t>(&self, text: &'t [u8]) -> Option<&'t str> {
        std::str::from_utf8(self.url_bytes(text)).ok()
    }
}

/// Iterator over successive non-overlapping image references.
pub struct ImageRefs<'t> {
    inner: CaptureMatches<'static, 't>,
}

impl Iterator for ImageRefs<'_> {
    type Item = ImageRef;

    fn next(&mut self) -> Option<ImageRef> {
        let caps = self.inner.next()?;
        let whole = caps.get(0)?;
        let alt = caps.get(1)?;
        let url = caps.get(2)?;
        Some(ImageRef {
            span: whole.range(),
            alt: alt.range(),
            url: url.range(),
        })
    }
}

/// Lazily finds every `![alt](url)` in `text`, in document order.
pub fn image_refs(text: &[u8]) -> ImageRefs<'_> {
    ImageRefs {
        inner: IMAGE_LINK.captures_iter(text),
    }
}
