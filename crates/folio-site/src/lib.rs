//! Multi-language content resolution and routing for Folio.
//!
//! Content lives in a directory tree: every directory is a page, with one
//! content file per language and optional metadata files for attached
//! files. This crate provides:
//! - [`LanguageSet`]: the configured languages and their base URLs
//! - [`Inventory`]: classification of a page directory listing
//! - [`ContentRecord`]: parsed content with field-level language fallback
//! - [`Site`]: shared, read-only site context
//! - [`Request`]: request-scoped page tree, caches, routing, slugs, URIs,
//!   URLs and content mutations
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
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
//! if let Some(page) = route.page {
//!     let title = request.content(page, None).value("title").to_owned();
//!     let url = request.url(page, None);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod content;
mod inventory;
mod language;
mod mutation;
mod page;
mod request;
mod resolver;
mod router;
mod session;
mod site;
#[cfg(test)]
mod testing;
mod translator;
mod tree;

pub use content::{ContentError, ContentRecord, Field, fallback_merge, normalize_key};
pub use inventory::Inventory;
pub use language::{Language, LanguageError, LanguageSet, SITE_BASE_PLACEHOLDER};
pub use mutation::{DEFAULT_TEMPLATE, MutationError};
pub use page::{PageIdentity, PageRef};
pub use request::Request;
pub use router::{Route, RouteKind};
pub use session::{LANGUAGE_SESSION_KEY, MemorySession, Session};
pub use site::{Site, SiteOptions};
pub use translator::{URL_KEY_FIELD, slugify};
pub use tree::PageId;
