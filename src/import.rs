//! Reading documents from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions accepted by [`read_document`], compared case-insensitively.
pub const IMPORT_EXTENSIONS: &[&str] = &["md", "txt"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{} is not a .md or .txt file", path.display())]
    UnsupportedExtension { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ImportError {
    /// Rejections that never touched the filesystem.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::UnsupportedExtension { .. })
    }
}

pub fn is_importable(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMPORT_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Read the whole file as text. Invalid UTF-8 is replaced, not rejected.
///
/// # Errors
///
/// Returns [`ImportError::UnsupportedExtension`] for anything other than
/// `.md` / `.txt`, and [`ImportError::Read`] if the file cannot be read.
pub fn read_document(path: &Path) -> Result<String, ImportError> {
    if !is_importable(path) {
        return Err(ImportError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read document");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_extension_check_ignores_case() {
        assert!(is_importable(Path::new("notes.md")));
        assert!(is_importable(Path::new("NOTES.TXT")));
        assert!(is_importable(Path::new("dir/readme.Md")));
        assert!(!is_importable(Path::new("page.html")));
        assert!(!is_importable(Path::new("md")));
    }

    #[test]
    fn test_read_document_returns_full_text() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hello.md");
        std::fs::write(&path, "# Hello\n\nworld\n").unwrap();
        assert_eq!(read_document(&path).unwrap(), "# Hello\n\nworld\n");
    }

    #[test]
    fn test_wrong_extension_is_rejected_without_reading() {
        let err = read_document(Path::new("/nonexistent/page.html")).unwrap_err();
        assert!(err.is_rejection());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = read_document(&dir.path().join("gone.md")).unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
        assert!(!err.is_rejection());
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, b"caf\xe9").unwrap();
        assert_eq!(read_document(&path).unwrap(), "caf\u{fffd}");
    }
}
