//! Shared site context.
//!
//! [`Site`] holds what every request needs and nothing a request changes:
//! the storage backend, the language registry and the site options.
//!
//! # Thread Safety
//!
//! `Site` is `Send + Sync` and is meant to be shared behind an `Arc` by a
//! multi-request host. All mutable state lives in the [`Request`] returned by
//! [`Site::request`], which borrows the site and is dropped with the request.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use folio_site::{Language, LanguageSet, Site, SiteOptions};
//! use folio_storage::FsStorage;
//!
//! let languages = LanguageSet::new(
//!     vec![
//!         Language::new("en", "English", "en_US", true),
//!         Language::new("de", "Deutsch", "de_DE", false),
//!     ],
//!     "https://example.com",
//! )?;
//! let storage = Arc::new(FsStorage::new(PathBuf::from("content")));
//! let site = Site::new(storage, languages, SiteOptions::default());
//!
//! let request = site.request();
//! let route = request.route("de/baender");
//! ```

use std::sync::Arc;

use folio_storage::Storage;

use crate::language::LanguageSet;
use crate::request::Request;

/// Site-wide options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteOptions {
    /// Extension of content and metadata files, without the dot.
    pub content_suffix: String,
    /// Uid of the home page.
    pub home: String,
    /// Uid of the error page.
    pub error: String,
    /// Use the session's remembered language for paths without a language
    /// prefix.
    pub remember_language: bool,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            content_suffix: "txt".to_owned(),
            home: "home".to_owned(),
            error: "error".to_owned(),
            remember_language: false,
        }
    }
}

/// Shared, read-only site context.
pub struct Site {
    storage: Arc<dyn Storage>,
    languages: LanguageSet,
    options: SiteOptions,
}

impl Site {
    /// Create a site over a content storage.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, languages: LanguageSet, options: SiteOptions) -> Self {
        Self {
            storage,
            languages,
            options,
        }
    }

    /// Start a request.
    ///
    /// The request starts in the default language with no current page.
    #[must_use]
    pub fn request(&self) -> Request<'_> {
        Request::new(self)
    }

    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    #[must_use]
    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    #[must_use]
    pub fn options(&self) -> &SiteOptions {
        &self.options
    }

    /// Configured language codes, in configuration order.
    pub(crate) fn language_codes(&self) -> Vec<&str> {
        self.languages.codes().collect()
    }
}
