//! Validation of the document passed on the command line.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::utils::path::normalize_path;

/// File extensions accepted as markdown (compared case-insensitively).
pub const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Errors that stop mdserve before any server state exists.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("{0} not found")]
    NotFound(PathBuf),

    #[error("{0} is not a file")]
    NotAFile(PathBuf),

    #[error("{0} is not a markdown file (expected .md or .markdown)")]
    NotMarkdown(PathBuf),

    #[error("can't initialize cache dir `{0}`")]
    CacheDir(PathBuf, #[source] std::io::Error),

    #[error("no cache directory available for this user")]
    NoCacheDir,
}

/// Check that `path` names an existing markdown file.
///
/// Returns the normalized absolute path used for reading and watching.
pub fn validate_target(path: &Path) -> Result<PathBuf, StartupError> {
    if !path.exists() {
        return Err(StartupError::NotFound(path.to_path_buf()));
    }
    if !is_markdown(path) {
        return Err(StartupError::NotMarkdown(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(StartupError::NotAFile(path.to_path_buf()));
    }
    Ok(normalize_path(path))
}

/// Whether the path carries a markdown extension.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            MARKDOWN_EXTENSIONS
                .iter()
                .any(|md| ext.eq_ignore_ascii_case(md))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("README.md")));
        assert!(is_markdown(Path::new("notes/Todo.MD")));
        assert!(is_markdown(Path::new("book.markdown")));
        assert!(!is_markdown(Path::new("notes.txt")));
        assert!(!is_markdown(Path::new("md")));
        assert!(!is_markdown(Path::new("archive.md.gz")));
    }

    #[test]
    fn test_validate_missing_file() {
        let err = validate_target(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, StartupError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_validate_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "# Hello").unwrap();

        let err = validate_target(&path).unwrap_err();
        assert!(matches!(err, StartupError::NotMarkdown(_)));
        assert!(err.to_string().contains("not a markdown file"));
    }

    #[test]
    fn test_validate_directory_with_markdown_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.md");
        std::fs::create_dir(&path).unwrap();

        let err = validate_target(&path).unwrap_err();
        assert!(matches!(err, StartupError::NotAFile(_)));
    }

    #[test]
    fn test_validate_ok_returns_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        std::fs::write(&path, "# Hello").unwrap();

        let resolved = validate_target(&path).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved.file_name().unwrap(), "README.md");
    }
}
