//! Basename extraction from image references.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Extracts the last non-empty path segment of `url`, percent-decoded.
///
/// Absolute URLs go through the `url` crate, so query and fragment are
/// ignored. Anything else (a relative path such as `images/a.png`, which is
/// what an already rewritten link looks like) is split on `/` after cutting
/// at the first `?` or `#`.
pub fn basename_from_url(url: &str) -> Option<String> {
    let url = url.trim();
    if let Ok(parsed) = url::Url::parse(url) {
        // `data:` and `mailto:` style URLs have no path to name a file after.
        if parsed.cannot_be_a_base() {
            return None;
        }
        return last_segment(parsed.path());
    }
    last_segment(strip_query(url))
}

/// Cuts a relative reference at the first `?` or `#`.
pub(super) fn strip_query(reference: &str) -> &str {
    reference.split(['?', '#']).next().unwrap_or("")
}

/// Percent-decodes `s`; text that does not decode to UTF-8 is kept as written.
pub(super) fn decode(s: &str) -> Cow<'_, str> {
    match percent_decode_str(s).decode_utf8() {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(s),
    }
}

fn last_segment(path: &str) -> Option<String> {
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    let segment = decode(segment);
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.into_owned())
}
