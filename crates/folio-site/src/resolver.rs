//! Content resolution with field-level language fallback.
//!
//! Resolving an entity (a page, or a file attached to a page) for a language:
//!
//! 1. No explicit language: use the request language and serve from the
//!    page cache when possible.
//! 2. Pick the inventory entry for the language, or the default language's
//!    entry if there is none.
//! 3. Load and parse it.
//! 4. For a non-default language, fallback-merge the default language record.
//! 5. Cache the result only for the implicit request language.
//!
//! Resolution never fails: missing files give an empty record, unreadable or
//! malformed files are logged and give an empty record.

use std::collections::BTreeMap;
use std::rc::Rc;

use folio_storage::join_path;

use crate::content::{ContentRecord, fallback_merge};
use crate::language::Language;
use crate::request::Request;
use crate::tree::PageId;

impl<'s> Request<'s> {
    /// Content of a page.
    ///
    /// `language` selects an explicit language; `None` (or an unknown code)
    /// uses the request language.
    #[must_use]
    pub fn content(&self, page: PageId, language: Option<&str>) -> Rc<ContentRecord> {
        if let Some(language) = self.explicit_language(language) {
            return Rc::new(self.resolve_page(page, language));
        }

        let language = self.language();
        if let Some(record) = self.with_cache(page, |c| c.content.get(&language.code).cloned()) {
            tracing::debug!(page = %self.storage_path(page), language = %language.code, "Content cache hit");
            return record;
        }

        let record = Rc::new(self.resolve_page(page, language));
        self.with_cache(page, |c| {
            c.content
                .insert(language.code.clone(), Rc::clone(&record));
        });
        record
    }

    /// Metadata of a file attached to a page.
    ///
    /// Files without metadata, and names that aren't attached files of the
    /// page, resolve to an empty record.
    #[must_use]
    pub fn file_content(
        &self,
        page: PageId,
        file: &str,
        language: Option<&str>,
    ) -> Rc<ContentRecord> {
        if let Some(language) = self.explicit_language(language) {
            return Rc::new(self.resolve_file(page, file, language));
        }

        let language = self.language();
        let key = (file.to_owned(), language.code.clone());
        if let Some(record) = self.with_cache(page, |c| c.files.get(&key).cloned()) {
            return record;
        }

        let record = Rc::new(self.resolve_file(page, file, language));
        self.with_cache(page, |c| {
            c.files.insert(key, Rc::clone(&record));
        });
        record
    }

    fn resolve_page(&self, page: PageId, language: &Language) -> ContentRecord {
        let inventory = self.inventory(page);
        self.resolve_entry(page, Some(&inventory.content), language)
    }

    fn resolve_file(&self, page: PageId, file: &str, language: &Language) -> ContentRecord {
        let inventory = self.inventory(page);
        self.resolve_entry(page, inventory.meta_files(file), language)
    }

    /// Resolve one of the per-language file maps of an inventory.
    fn resolve_entry(
        &self,
        page: PageId,
        entries: Option<&BTreeMap<String, String>>,
        language: &Language,
    ) -> ContentRecord {
        let default = self.site().languages().default_language();
        let Some(entries) = entries else {
            return ContentRecord::empty(&language.code);
        };

        let default_file = entries.get(&default.code);
        let file = entries.get(&language.code).or(default_file);

        let dir = self.storage_path(page);
        let primary = self.load_record(&dir, file.map(String::as_str), &language.code);
        if language.is_default || file == default_file {
            return primary;
        }

        let fallback = self.load_record(&dir, default_file.map(String::as_str), &default.code);
        fallback_merge(&primary, &fallback)
    }

    /// Load and parse a content file, degrading to an empty record.
    fn load_record(&self, dir: &str, file: Option<&str>, code: &str) -> ContentRecord {
        let Some(file) = file else {
            return ContentRecord::empty(code);
        };
        let path = join_path(dir, file);

        let text = match self.site().storage().read(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to read content file");
                return ContentRecord::empty(code);
            }
        };

        match ContentRecord::parse(&text, code, Some(path.clone())) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to parse content file");
                ContentRecord::empty(code)
            }
        }
    }
}
