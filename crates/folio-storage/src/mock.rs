//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::storage::{Entry, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// Split a path into its parent directory and final name.
fn split_path(path: &str) -> (&str, &str) {
    path.rsplit_once('/').unwrap_or(("", path))
}

/// Mock storage for testing.
///
/// Stores files and directories in memory. Use the builder methods to
/// configure the mock with test data. Parent directories are created
/// implicitly. `list` and `read` calls are counted so tests can assert
/// that cached lookups don't touch storage.
///
/// # Example
///
/// ```ignore
/// use folio_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("blog/blog.txt", "Title: Hello")
///     .with_file("blog/blog.de.txt", "Title: Hallo");
///
/// let entries = storage.list("blog").unwrap();
/// assert_eq!(entries.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<String, String>>,
    dirs: RwLock<BTreeSet<String>>,
    list_calls: AtomicUsize,
    read_calls: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content, creating its parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.files.write().unwrap().insert(path, content.into());
        self
    }

    /// Add an empty directory, creating its parents.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.add_parents(&path);
        self.dirs.write().unwrap().insert(path);
        self
    }

    /// Make every subsequent `write`, `rename` and `remove` fail.
    #[must_use]
    pub fn with_failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::Relaxed);
        self
    }

    /// Number of `list` calls so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// Number of `read` calls so far.
    #[must_use]
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::Relaxed)
    }

    /// Register every ancestor directory of `path`.
    fn add_parents(&self, path: &str) {
        let mut dirs = self.dirs.write().unwrap();
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            dirs.insert(parent.to_owned());
            current = parent;
        }
    }

    fn dir_exists(&self, dir: &str) -> bool {
        dir.is_empty() || self.dirs.read().unwrap().contains(dir)
    }

    fn check_writable(&self, path: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &str) -> Result<Vec<Entry>, StorageError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        if !self.dir_exists(dir) {
            return Err(StorageError::not_found(dir).with_backend(BACKEND));
        }

        let dirs = self.dirs.read().unwrap();
        let files = self.files.read().unwrap();

        let mut entries: Vec<Entry> = dirs
            .iter()
            .filter(|d| split_path(d).0 == dir && !d.is_empty())
            .map(|d| Entry::dir(split_path(d).1))
            .chain(
                files
                    .keys()
                    .filter(|f| split_path(f).0 == dir)
                    .map(|f| Entry::file(split_path(f).1)),
            )
            .filter(|e| !e.name.starts_with('.'))
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().unwrap().contains_key(path) || self.dir_exists(path)
    }

    fn write(&self, path: &str, content: &str) -> Result<(), StorageError> {
        self.check_writable(path)?;

        if !self.dir_exists(split_path(path).0) {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }

        self.files
            .write()
            .unwrap()
            .insert(path.to_owned(), content.to_owned());
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        self.check_writable(from)?;

        if self.exists(to) {
            return Err(StorageError::new(StorageErrorKind::AlreadyExists)
                .with_path(to)
                .with_backend(BACKEND));
        }

        let mut files = self.files.write().unwrap();
        let content = files
            .remove(from)
            .ok_or_else(|| StorageError::not_found(from).with_backend(BACKEND))?;
        files.insert(to.to_owned(), content);
        Ok(())
    }

    fn remove(&self, path: &str) -> Result<(), StorageError> {
        self.check_writable(path)?;
        self.files
            .write()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_storage_is_send_sync() {
        assert_send_sync::<MockStorage>();
    }

    #[test]
    fn test_new_empty_root() {
        let storage = MockStorage::new();

        assert!(storage.list("").unwrap().is_empty());
    }

    #[test]
    fn test_with_file_creates_parents() {
        let storage = MockStorage::new().with_file("1-blog/2-post/post.txt", "Title: Post");

        assert_eq!(storage.list("").unwrap(), vec![Entry::dir("1-blog")]);
        assert_eq!(storage.list("1-blog").unwrap(), vec![Entry::dir("2-post")]);
        assert_eq!(
            storage.list("1-blog/2-post").unwrap(),
            vec![Entry::file("post.txt")]
        );
    }

    #[test]
    fn test_list_mixed_sorted() {
        let storage = MockStorage::new()
            .with_file("blog/blog.txt", "")
            .with_file("blog/a.jpg", "")
            .with_dir("blog/child");

        assert_eq!(
            storage.list("blog").unwrap(),
            vec![
                Entry::file("a.jpg"),
                Entry::file("blog.txt"),
                Entry::dir("child"),
            ]
        );
    }

    #[test]
    fn test_list_missing_dir() {
        let storage = MockStorage::new();

        assert!(storage.list("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_call_counters() {
        let storage = MockStorage::new().with_file("site.txt", "Title: Site");

        let _ = storage.list("");
        let _ = storage.read("site.txt");
        let _ = storage.read("missing.txt");

        assert_eq!(storage.list_calls(), 1);
        assert_eq!(storage.read_calls(), 2);
    }

    #[test]
    fn test_write_rename_remove() {
        let storage = MockStorage::new().with_dir("blog");

        storage.write("blog/a.jpg", "jpg").unwrap();
        storage.rename("blog/a.jpg", "blog/b.jpg").unwrap();
        assert!(!storage.exists("blog/a.jpg"));
        assert_eq!(storage.read("blog/b.jpg").unwrap(), "jpg");

        storage.remove("blog/b.jpg").unwrap();
        assert!(!storage.exists("blog/b.jpg"));
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let storage = MockStorage::new();

        assert!(storage.write("nope/a.txt", "").is_err());
    }

    #[test]
    fn test_failing_writes() {
        let storage = MockStorage::new()
            .with_file("site.txt", "Title: Site")
            .with_failing_writes();

        let err = storage.write("site.txt", "Title: Other").unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
        assert_eq!(storage.read("site.txt").unwrap(), "Title: Site");
    }
}
