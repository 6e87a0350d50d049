//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading and mutating page directories on the
//! local filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Entry, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at the content directory.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use folio_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("content"));
/// for entry in storage.list("")? {
///     println!("{} (dir: {})", entry.name, entry.is_dir);
/// }
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Root directory of the content tree.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of the content tree.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a storage path to a filesystem path.
    ///
    /// Rejects paths containing parent directory components (`..`) or
    /// absolute roots so no path can escape the content directory.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(path);
        let escapes = rel
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(rel)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(rel))
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &str) -> Result<Vec<Entry>, StorageError> {
        let full_path = self.resolve(dir)?;
        let entries = fs::read_dir(&full_path)
            .map_err(|e| StorageError::io(e, &full_path).with_backend(BACKEND))?;

        let mut listing: Vec<Entry> = entries
            .filter_map(Result::ok)
            .filter_map(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    return None;
                }
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                Some(Entry { name, is_dir })
            })
            .collect();

        listing.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, &full_path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.exists())
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        tracing::debug!(path = %path, bytes = content.len(), "Writing file");
        fs::write(&full_path, content)
            .map_err(|e| StorageError::io(e, &full_path).with_backend(BACKEND))
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;

        if to_path.exists() {
            return Err(StorageError::new(StorageErrorKind::AlreadyExists)
                .with_path(to_path)
                .with_backend(BACKEND));
        }

        tracing::debug!(from = %from, to = %to, "Renaming file");
        fs::rename(&from_path, &to_path)
            .map_err(|e| StorageError::io(e, &from_path).with_backend(BACKEND))
    }

    fn remove(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path)?;
        tracing::debug!(path = %path, "Removing file");
        fs::remove_file(&full_path)
            .map_err(|e| StorageError::io(e, &full_path).with_backend(BACKEND))
    }
}
