//! URL modeling and local filename derivation.
//!
//! Maps an image URL to the name it is saved under inside the images
//! directory, and builds the link text that replaces the URL in Markdown.

mod path;
mod sanitize;
mod source;

pub use path::basename_from_url;
pub use sanitize::sanitize_filename_for_linux;
pub use source::ImageSource;

use std::path::Path;

/// Derives the local image filename for `url`.
///
/// Uses the last path segment of the URL, percent-decoded and sanitized for
/// Linux. Returns `None` when nothing usable remains (empty, `.` or `..`), in
/// which case the reference is left alone.
///
/// # Examples
///
/// - `local_image_name("https://example.com/a/logo.png")` → `Some("logo.png")`
/// - `local_image_name("images/logo.png")` → `Some("logo.png")`
/// - `local_image_name("https://example.com/")` → `None`
pub fn local_image_name(url: &str) -> Option<String> {
    let raw = basename_from_url(url)?;
    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        None
    } else {
        Some(sanitized)
    }
}

/// Builds the text written into the Markdown link for a local image.
///
/// The configured images directory is used as written, with `/` separators,
/// so the default `images` yields `images/<name>`.
pub fn link_text(images_dir: &Path, name: &str) -> String {
    let prefix = images_dir.to_string_lossy().replace('\\', "/");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() || prefix == "." {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_from_absolute_url() {
        assert_eq!(
            local_image_name("https://example.com/a/logo.png").as_deref(),
            Some("logo.png")
        );
        assert_eq!(
            local_image_name("http://x/y/img1.png?size=large").as_deref(),
            Some("img1.png")
        );
    }

    #[test]
    fn local_name_is_decoded() {
        assert_eq!(
            local_image_name("https://h/a/%C3%BC.png").as_deref(),
            Some("ü.png")
        );
        // An encoded slash must not escape the images directory.
        assert_eq!(
            local_image_name("https://h/a/..%2F..%2Fetc%2Fpasswd").as_deref(),
            Some("_.._etc_passwd")
        );
    }

    #[test]
    fn local_name_from_rewritten_link() {
        assert_eq!(
            local_image_name("images/img1.png").as_deref(),
            Some("img1.png")
        );
    }

    #[test]
    fn local_name_unusable() {
        assert_eq!(local_image_name(""), None);
        assert_eq!(local_image_name("https://example.com/"), None);
        assert_eq!(local_image_name("https://example.com/.."), None);
        assert_eq!(local_image_name("  "), None);
    }

    #[test]
    fn link_text_default_dir() {
        assert_eq!(link_text(Path::new("images"), "a.png"), "images/a.png");
        assert_eq!(link_text(Path::new("images/"), "a.png"), "images/a.png");
    }

    #[test]
    fn link_text_nested_and_current_dir() {
        assert_eq!(
            link_text(Path::new("assets/img"), "a.png"),
            "assets/img/a.png"
        );
        assert_eq!(link_text(Path::new("."), "a.png"), "a.png");
    }
}
