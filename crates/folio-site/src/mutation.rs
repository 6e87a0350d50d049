//! Content file mutations.
//!
//! Every mutation invalidates the cache of the page it touches before it
//! returns, whether it succeeded or not, so later lookups in the same
//! request never see a stale inventory.

use std::collections::BTreeMap;

use folio_storage::{StorageError, join_path};

use crate::content::{ContentError, ContentRecord};
use crate::request::Request;
use crate::tree::PageId;

/// Template name for pages without any content file yet.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Error returned when a mutation fails.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    /// Storage operation failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Language code isn't configured.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    /// Target file doesn't exist in the page directory.
    #[error("file not found: {0}")]
    FileNotFound(String),
    /// Page has no content file for the language.
    #[error("no {language} content in page '{page}'")]
    MissingContent {
        /// Storage path of the page.
        page: String,
        /// Language code.
        language: String,
    },
    /// File name is empty or contains a path separator.
    #[error("invalid file name: {0}")]
    InvalidName(String),
    /// Existing content file can't be parsed.
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl<'s> Request<'s> {
    /// Set fields of a page's content file for a language.
    ///
    /// Existing fields keep their position; new fields are appended. A
    /// missing language file is created as `<template>.<lang>.<suffix>`,
    /// without the language tag for the default language.
    pub fn update_content<K, V>(
        &self,
        page: PageId,
        language: &str,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), MutationError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let result = self.write_page_fields(page, language, fields);
        self.invalidate(page);
        result
    }

    /// Set metadata fields of an attached file for a language.
    pub fn update_file_content<K, V>(
        &self,
        page: PageId,
        file: &str,
        language: &str,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), MutationError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let result = self.write_file_fields(page, file, language, fields);
        self.invalidate(page);
        result
    }

    /// Remove a page's content file for a language.
    pub fn delete_content(&self, page: PageId, language: &str) -> Result<(), MutationError> {
        let result = self.remove_content_file(page, language);
        self.invalidate(page);
        result
    }

    /// Rename an attached file together with its metadata files.
    pub fn rename_file(&self, page: PageId, from: &str, to: &str) -> Result<(), MutationError> {
        let result = self.rename_attached(page, from, to);
        self.invalidate(page);
        result
    }

    fn write_page_fields<K, V>(
        &self,
        page: PageId,
        language: &str,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), MutationError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let inventory = self.inventory(page);
        let codes = self.site().language_codes();
        let default_code = &self.site().languages().default_language().code;
        let template = inventory
            .template(default_code, &codes, &self.site().options().content_suffix)
            .unwrap_or(DEFAULT_TEMPLATE)
            .to_owned();

        self.write_fields(page, &inventory.content, &template, language, fields)
    }

    fn write_file_fields<K, V>(
        &self,
        page: PageId,
        file: &str,
        language: &str,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), MutationError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let inventory = self.inventory(page);
        if !inventory.files.contains(file) {
            return Err(MutationError::FileNotFound(file.to_owned()));
        }

        let empty = BTreeMap::new();
        let entries = inventory.meta_files(file).unwrap_or(&empty);
        self.write_fields(page, entries, file, language, fields)
    }

    /// Upsert fields into the raw (unmerged) file of one language.
    fn write_fields<K, V>(
        &self,
        page: PageId,
        entries: &BTreeMap<String, String>,
        base: &str,
        language: &str,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), MutationError>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let language = self
            .site()
            .languages()
            .find(language)
            .ok_or_else(|| MutationError::UnknownLanguage(language.to_owned()))?;
        let storage = self.site().storage();
        let dir = self.storage_path(page);
        let suffix = &self.site().options().content_suffix;

        let (path, mut record) = match entries.get(&language.code) {
            Some(file) => {
                let path = join_path(&dir, file);
                let text = storage.read(&path)?;
                let record = ContentRecord::parse(&text, &language.code, Some(path.clone()))?;
                (path, record)
            }
            None => {
                let file = if language.is_default {
                    format!("{base}.{suffix}")
                } else {
                    format!("{base}.{}.{suffix}", language.code)
                };
                (join_path(&dir, &file), ContentRecord::empty(&language.code))
            }
        };

        for (key, value) in fields {
            record.set(key.as_ref(), value);
        }

        tracing::info!(path = %path, language = %language.code, "Writing content");
        storage.write(&path, &record.to_text())?;
        Ok(())
    }

    fn remove_content_file(&self, page: PageId, language: &str) -> Result<(), MutationError> {
        let language = self
            .site()
            .languages()
            .find(language)
            .ok_or_else(|| MutationError::UnknownLanguage(language.to_owned()))?;
        let inventory = self.inventory(page);
        let dir = self.storage_path(page);
        let file = inventory
            .content_file(&language.code)
            .ok_or_else(|| MutationError::MissingContent {
                page: dir.clone(),
                language: language.code.clone(),
            })?;

        let path = join_path(&dir, file);
        tracing::info!(path = %path, "Deleting content");
        self.site().storage().remove(&path)?;
        Ok(())
    }

    fn rename_attached(&self, page: PageId, from: &str, to: &str) -> Result<(), MutationError> {
        if to.is_empty() || to.contains('/') {
            return Err(MutationError::InvalidName(to.to_owned()));
        }

        let inventory = self.inventory(page);
        if !inventory.files.contains(from) {
            return Err(MutationError::FileNotFound(from.to_owned()));
        }

        let storage = self.site().storage();
        let dir = self.storage_path(page);
        storage.rename(&join_path(&dir, from), &join_path(&dir, to))?;

        if let Some(meta) = inventory.meta_files(from) {
            for meta_file in meta.values() {
                let renamed = format!("{to}{}", &meta_file[from.len()..]);
                storage.rename(&join_path(&dir, meta_file), &join_path(&dir, &renamed))?;
            }
        }

        tracing::info!(page = %dir, from = %from, to = %to, "Renamed file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use folio_storage::{MockStorage, Storage, StorageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing;

    #[test]
    fn test_update_existing_translation() {
        let (storage, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();
        assert_eq!(request.content(blog, None).value("title"), "Hello");

        request
            .update_content(blog, "de", [("Title", "Servus"), ("Summary", "Kurz")])
            .unwrap();

        let text = storage.read("blog/blog.de.txt").unwrap();
        assert!(text.starts_with("Title: Servus\n\n----\n\n"));
        assert!(text.contains("\n\nUrl-Key: baender\n\n"));
        assert!(text.ends_with("Summary: Kurz\n"));
        assert_eq!(request.content(blog, Some("de")).value("title"), "Servus");
        assert_eq!(request.content(blog, Some("de")).value("url_key"), "baender");
    }

    #[test]
    fn test_update_creates_translation_from_template() {
        let (storage, site) = testing::site();
        let request = site.request();
        let post = request.find("blog/second-post").unwrap();
        request.set_language("de");
        assert_eq!(request.content(post, None).value("title"), "Second");

        request.update_content(post, "de", [("Title", "Zweiter")]).unwrap();
        request.update_content(post, "de", [("Text", "Hallo")]).unwrap();

        assert_eq!(
            storage.read("blog/02-second-post/post.de.txt").unwrap(),
            "Title: Zweiter\n\n----\n\nText: Hallo\n"
        );
        assert_eq!(request.content(post, None).value("title"), "Zweiter");
    }

    #[test]
    fn test_update_default_language_without_tag() {
        let (storage, site) = testing::site();
        let request = site.request();
        let drafts = request.find("blog/drafts").unwrap();

        request.update_content(drafts, "en", [("Title", "Drafts")]).unwrap();

        assert_eq!(storage.read("blog/drafts/default.txt").unwrap(), "Title: Drafts\n");
        assert_eq!(request.inventory(drafts).content_file("en"), Some("default.txt"));
    }

    #[test]
    fn test_update_unknown_language() {
        let (_, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();

        let err = request
            .update_content(blog, "fr", [("Title", "Bonjour")])
            .unwrap_err();

        assert!(matches!(err, MutationError::UnknownLanguage(code) if code == "fr"));
    }

    #[test]
    fn test_failed_update_still_invalidates() {
        let storage = Arc::new(testing::storage().with_failing_writes());
        let site = testing::site_over_shared(Arc::clone(&storage), crate::SiteOptions::default());
        let request = site.request();
        let blog = request.find("blog").unwrap();
        let _ = request.content(blog, None);
        let _ = request.slug(blog, None);
        assert!(!request.cache_is_empty(blog));

        let err = request.update_content(blog, "en", [("Title", "Hi")]).unwrap_err();

        assert!(matches!(err, MutationError::Storage(ref e) if e.kind == StorageErrorKind::PermissionDenied));
        assert!(request.cache_is_empty(blog));
        let lists = storage.list_calls();
        let _ = request.content(blog, None);
        assert_eq!(storage.list_calls(), lists + 1);
    }

    #[test]
    fn test_update_with_malformed_file() {
        let (_, site) = testing::site_with(|storage| {
            storage.with_file("broken/broken.txt", "Title: One\n----\ntitle: Two")
        });
        let request = site.request();
        let broken = request.find("broken").unwrap();

        let err = request.update_content(broken, "en", [("Title", "Fixed")]).unwrap_err();

        assert!(matches!(err, MutationError::Content(ContentError::DuplicateField { .. })));
    }

    #[test]
    fn test_delete_translation_falls_back() {
        let (storage, site) = testing::site();
        let request = site.request();
        request.set_language("de");
        let blog = request.find("blog").unwrap();
        assert_eq!(request.content(blog, None).value("title"), "Hallo");

        request.delete_content(blog, "de").unwrap();

        assert!(!storage.exists("blog/blog.de.txt"));
        assert_eq!(request.content(blog, None).value("title"), "Hello");
        assert_eq!(request.slug(blog, None), "blog");
    }

    #[test]
    fn test_delete_missing_translation() {
        let (_, site) = testing::site();
        let request = site.request();
        let drafts = request.find("blog/drafts").unwrap();

        let err = request.delete_content(drafts, "de").unwrap_err();

        assert!(matches!(err, MutationError::MissingContent { ref language, .. } if language == "de"));
    }

    #[test]
    fn test_rename_file_with_metadata() {
        let (storage, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();
        assert_eq!(request.file_content(blog, "photo.jpg", None).value("caption"), "A photo");

        request.rename_file(blog, "photo.jpg", "cover.jpg").unwrap();

        assert!(storage.exists("blog/cover.jpg"));
        assert!(storage.exists("blog/cover.jpg.txt"));
        assert!(storage.exists("blog/cover.jpg.de.txt"));
        assert!(!storage.exists("blog/photo.jpg.txt"));
        assert!(request.file_content(blog, "photo.jpg", None).is_empty());
        assert_eq!(
            request.file_content(blog, "cover.jpg", Some("de")).value("caption"),
            "Ein Foto"
        );
    }

    #[test]
    fn test_rename_unknown_file() {
        let (_, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();

        let err = request.rename_file(blog, "blog.txt", "other.txt").unwrap_err();

        assert!(matches!(err, MutationError::FileNotFound(name) if name == "blog.txt"));
    }

    #[test]
    fn test_rename_rejects_paths() {
        let (_, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();

        let err = request.rename_file(blog, "photo.jpg", "../photo.jpg").unwrap_err();

        assert!(matches!(err, MutationError::InvalidName(_)));
    }

    #[test]
    fn test_rename_onto_existing_file() {
        let storage = MockStorage::new()
            .with_file("blog/blog.txt", "Title: Hello")
            .with_file("blog/a.jpg", "")
            .with_file("blog/b.jpg", "");
        let site = testing::site_over(storage, crate::SiteOptions::default());
        let request = site.request();
        let blog = request.find("blog").unwrap();
        let _ = request.inventory(blog);

        let err = request.rename_file(blog, "a.jpg", "b.jpg").unwrap_err();

        assert!(matches!(err, MutationError::Storage(ref e) if e.kind == StorageErrorKind::AlreadyExists));
        assert!(request.cache_is_empty(blog));
    }

    #[test]
    fn test_update_file_metadata() {
        let (storage, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();

        request
            .update_file_content(blog, "photo.jpg", "de", [("Credit", "Johanna")])
            .unwrap();
        request
            .update_file_content(blog, "notes.pdf", "de", [("Title", "Notizen")])
            .unwrap();

        assert_eq!(
            request.file_content(blog, "photo.jpg", Some("de")).value("credit"),
            "Johanna"
        );
        assert_eq!(
            storage.read("blog/notes.pdf.de.txt").unwrap(),
            "Title: Notizen\n"
        );
    }
}
