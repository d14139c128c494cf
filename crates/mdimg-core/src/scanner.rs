//! Directory scan for Markdown files (top level only, no recursion).

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default Markdown extension (without the dot).
pub const MARKDOWN_EXTENSION: &str = "md";

/// Returns true if `name` ends with `.<extension>`, ignoring ASCII case.
pub fn has_extension(name: &str, extension: &str) -> bool {
    let suffix_len = extension.len() + 1;
    if name.len() < suffix_len || !name.is_char_boundary(name.len() - suffix_len) {
        return false;
    }
    let suffix = &name[name.len() - suffix_len..];
    suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(extension)
}

/// Lists regular files in `dir` whose name ends with `.md` (any case), sorted by name.
pub fn scan_markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    scan_with_extension(dir, MARKDOWN_EXTENSION)
}

/// Like [`scan_markdown_files`] with a configurable extension.
pub fn scan_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("cannot list directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("cannot read entry in {}", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            tracing::debug!("skipping non-UTF-8 file name {:?}", name);
            continue;
        };
        if !has_extension(name, extension) {
            continue;
        }
        // Follows symlinks so a linked Markdown file still counts.
        let is_file = fs::metadata(entry.path())
            .map(|m| m.is_file())
            .unwrap_or(false);
        if !is_file {
            tracing::debug!("skipping {} (not a regular file)", name);
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    tracing::debug!("found {} markdown file(s) in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_extension("A.md", "md"));
        assert!(has_extension("a.MD", "md"));
        assert!(has_extension("x.Md", "md"));
        assert!(!has_extension("md", "md"));
        assert!(!has_extension("readme", "md"));
        assert!(!has_extension("notes.txt", "md"));
        assert!(!has_extension("archive.amd", "md"));
        assert!(has_extension(".md", "md"));
    }

    #[test]
    fn extension_match_multibyte_name() {
        assert!(has_extension("café.md", "md"));
        assert!(!has_extension("é", "md"));
    }

    #[test]
    fn selects_only_markdown_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.md"), "a").unwrap();
        fs::write(dir.path().join("a.MD"), "b").unwrap();
        fs::write(dir.path().join("note.txt"), "c").unwrap();

        let found = names(&scan_markdown_files(dir.path()).unwrap());
        assert_eq!(found.len(), 2);
        assert!(found.contains(&"A.md".to_string()));
        assert!(found.contains(&"a.MD".to_string()));
    }

    #[test]
    fn does_not_recurse_or_pick_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("inner.md"), "x").unwrap();
        fs::create_dir(dir.path().join("folder.md")).unwrap();
        fs::write(dir.path().join("top.md"), "y").unwrap();

        let found = names(&scan_markdown_files(dir.path()).unwrap());
        assert_eq!(found, vec!["top.md".to_string()]);
    }

    #[test]
    fn result_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for n in ["c.md", "a.md", "b.md"] {
            fs::write(dir.path().join(n), "").unwrap();
        }
        let found = names(&scan_markdown_files(dir.path()).unwrap());
        assert_eq!(found, vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.markdown"), "").unwrap();
        fs::write(dir.path().join("y.md"), "").unwrap();
        let found = names(&scan_with_extension(dir.path(), "markdown").unwrap());
        assert_eq!(found, vec!["x.markdown"]);
    }

    #[test]
    fn missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_markdown_files(&dir.path().join("nope")).unwrap_err();
        assert!(format!("{:#}", err).contains("cannot list directory"));
    }
}
