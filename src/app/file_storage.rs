//! Local document storage.
//!
//! Uploads land under `<root>/<road_id>/`, with a counter suffix when a
//! filename is already taken. Size and content-type limits are enforced
//! before anything is written.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::domain::mime;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },
    #[error("File type {mime} not allowed")]
    DisallowedType { mime: String },
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A successfully stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub filename: String,
    pub filepath: String,
    pub size: usize,
    pub mime_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    max_file_size: usize,
    allowed_mime_types: &'static [&'static str],
}

impl FileStorage {
    pub fn new(
        root: PathBuf,
        max_file_size: usize,
        allowed_mime_types: &'static [&'static str],
    ) -> Self {
        Self {
            root,
            max_file_size,
            allowed_mime_types,
        }
    }

    /// Creates the storage root if missing. Called once at startup.
    pub async fn ensure_root(&self) -> Result<(), FileError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Validates and stores one upload for a road, returning where it landed.
    pub async fn save(
        &self,
        road_id: i32,
        filename: &str,
        contents: &[u8],
    ) -> Result<StoredFile, FileError> {
        if contents.len() > self.max_file_size {
            return Err(FileError::TooLarge {
                size: contents.len(),
                limit: self.max_file_size,
            });
        }

        let resolved = mime::resolve(contents, filename);
        if !self.allowed_mime_types.contains(&resolved.mime) {
            return Err(FileError::DisallowedType {
                mime: resolved.mime.to_string(),
            });
        }

        let road_dir = self.root.join(road_id.to_string());
        tokio::fs::create_dir_all(&road_dir).await?;

        let unique = unique_filename(&road_dir, filename).await?;
        let filepath = road_dir.join(&unique);
        tokio::fs::write(&filepath, contents).await?;

        Ok(StoredFile {
            filename: unique,
            filepath: filepath.to_string_lossy().into_owned(),
            size: contents.len(),
            mime_type: resolved.mime,
        })
    }

    /// Removes a stored file. Returns false when there was nothing to remove.
    pub async fn remove(&self, filepath: &str) -> bool {
        tokio::fs::remove_file(filepath).await.is_ok()
    }

    /// Path check used by the download and delete endpoints: only paths under
    /// the storage root are touched on disk. `file_url` is client-supplied on
    /// the register endpoint, so a `..` component anywhere disqualifies the
    /// path even when the prefix matches the root.
    pub fn contains(&self, filepath: &str) -> bool {
        let path = Path::new(filepath);
        path.starts_with(&self.root)
            && !path
                .components()
                .any(|component| matches!(component, Component::ParentDir))
    }
}

/// Appends `_1`, `_2`, … to the stem until the name is free in `directory`.
async fn unique_filename(directory: &Path, filename: &str) -> Result<String, FileError> {
    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (filename, None),
    };

    let mut candidate = filename.to_string();
    let mut counter = 1;
    while tokio::fs::try_exists(directory.join(&candidate)).await? {
        candidate = match extension {
            Some(ext) => format!("{stem}_{counter}.{ext}"),
            None => format!("{stem}_{counter}"),
        };
        counter += 1;
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::ALLOWED_MIME_TYPES;

    fn storage(root: &Path, max: usize) -> FileStorage {
        FileStorage::new(root.to_path_buf(), max, ALLOWED_MIME_TYPES)
    }

    #[tokio::test]
    async fn saves_into_per_road_directory() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path(), 1024);
        let stored = storage.save(42, "notes.txt", b"hello").await.unwrap();
        assert_eq!(stored.filename, "notes.txt");
        assert_eq!(stored.mime_type, "text/plain");
        assert_eq!(stored.size, 5);
        assert!(stored.filepath.contains("42"));
        assert_eq!(tokio::fs::read(&stored.filepath).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn collisions_get_counter_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path(), 1024);
        let first = storage.save(1, "scan.pdf", b"%PDF-1").await.unwrap();
        let second = storage.save(1, "scan.pdf", b"%PDF-2").await.unwrap();
        let third = storage.save(1, "scan.pdf", b"%PDF-3").await.unwrap();
        assert_eq!(first.filename, "scan.pdf");
        assert_eq!(second.filename, "scan_1.pdf");
        assert_eq!(third.filename, "scan_2.pdf");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path(), 4);
        let err = storage.save(1, "big.txt", b"way too big").await.unwrap_err();
        assert!(matches!(err, FileError::TooLarge { size: 11, limit: 4 }));
        assert!(!dir.path().join("1").exists());
    }

    #[tokio::test]
    async fn disallowed_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path(), 1024);
        let err = storage.save(1, "site.zzz", &[0x00, 0x01]).await.unwrap_err();
        match err {
            FileError::DisallowedType { mime } => {
                assert_eq!(mime, "application/octet-stream");
            }
            other => panic!("expected DisallowedType, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remove_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path(), 1024);
        let stored = storage.save(1, "a.txt", b"x").await.unwrap();
        assert!(storage.remove(&stored.filepath).await);
        assert!(!storage.remove(&stored.filepath).await);
    }

    #[tokio::test]
    async fn extensionless_names_get_plain_counters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README"), b"x").unwrap();
        assert_eq!(
            unique_filename(dir.path(), "README").await.unwrap(),
            "README_1"
        );
    }

    #[test]
    fn contains_rejects_paths_escaping_the_root() {
        let storage = storage(Path::new("uploads/documents"), 1024);
        assert!(storage.contains("uploads/documents/1/scan.pdf"));
        assert!(!storage.contains("/etc/passwd"));
        assert!(!storage.contains("uploads/documents/../../etc/passwd"));
        assert!(!storage.contains("uploads/documents/1/../../../etc/passwd"));
    }
}
