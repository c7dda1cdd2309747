/// On-disk storage for task attachments
///
/// Files are written under a single root directory with a generated name
/// (`<uuid>-<sanitized original name>`), so two uploads never collide and
/// client-supplied names cannot escape the root.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Upload limit applied when none is configured (10 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Content type recorded when the client does not send one
pub const DEFAULT_MIMETYPE: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File exceeds the maximum upload size of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("Uploaded file is empty")]
    Empty,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file written by [`FileStorage::save`]
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: String,
    pub size: i64,
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
    max_file_bytes: u64,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>, max_file_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_file_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// Rejects empty and oversized payloads before anything is written
    pub fn check_size(&self, size: u64) -> Result<(), StorageError> {
        if size == 0 {
            return Err(StorageError::Empty);
        }
        if size > self.max_file_bytes {
            return Err(StorageError::TooLarge {
                size,
                max: self.max_file_bytes,
            });
        }
        Ok(())
    }

    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        self.check_size(bytes.len() as u64)?;

        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name));
        let path = self.root.join(file_name);
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "Stored attachment file");

        Ok(StoredFile {
            path: path.to_string_lossy().into_owned(),
            size: bytes.len() as i64,
        })
    }

    pub async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        Ok(tokio::fs::read(path).await?)
    }

    /// Deletes a stored file; a file that is already gone is not an error
    pub async fn remove(&self, path: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path, "Attachment file already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the final path component and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned.chars().take(200).collect()
    }
}
