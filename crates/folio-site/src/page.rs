//! Page handles for the rendering collaborator.

use std::rc::Rc;

use serde::Serialize;

use crate::content::ContentRecord;
use crate::inventory::Inventory;
use crate::request::Request;
use crate::tree::PageId;

/// A page bound to the request it was found in.
///
/// Thin convenience wrapper: every accessor forwards to the [`Request`].
#[derive(Clone, Copy)]
pub struct PageRef<'r, 's> {
    request: &'r Request<'s>,
    id: PageId,
}

impl<'r, 's> PageRef<'r, 's> {
    #[must_use]
    pub fn id(&self) -> PageId {
        self.id
    }

    #[must_use]
    pub fn uid(&self) -> String {
        self.request.uid(self.id)
    }

    #[must_use]
    pub fn num(&self) -> Option<u32> {
        self.request.num(self.id)
    }

    /// True for pages with a sort number.
    #[must_use]
    pub fn is_listed(&self) -> bool {
        self.num().is_some()
    }

    #[must_use]
    pub fn is_home(&self) -> bool {
        self.request.is_home(self.id)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.request.is_error(self.id)
    }

    #[must_use]
    pub fn parent(&self) -> Option<PageRef<'r, 's>> {
        self.request.parent(self.id).map(|id| self.request.page(id))
    }

    #[must_use]
    pub fn children(&self) -> Vec<PageRef<'r, 's>> {
        self.request
            .children(self.id)
            .iter()
            .map(|&id| self.request.page(id))
            .collect()
    }

    #[must_use]
    pub fn inventory(&self) -> Rc<Inventory> {
        self.request.inventory(self.id)
    }

    #[must_use]
    pub fn content(&self, language: Option<&str>) -> Rc<ContentRecord> {
        self.request.content(self.id, language)
    }

    #[must_use]
    pub fn file_content(&self, file: &str, language: Option<&str>) -> Rc<ContentRecord> {
        self.request.file_content(self.id, file, language)
    }

    #[must_use]
    pub fn slug(&self, language: Option<&str>) -> String {
        self.request.slug(self.id, language)
    }

    #[must_use]
    pub fn uri(&self, language: Option<&str>) -> String {
        self.request.uri(self.id, language)
    }

    #[must_use]
    pub fn url(&self, language: Option<&str>) -> String {
        self.request.url(self.id, language)
    }

    /// Resolved identity of the page in a language.
    #[must_use]
    pub fn identity(&self, language: Option<&str>) -> PageIdentity {
        let language_code = self
            .request
            .explicit_language(language)
            .unwrap_or(self.request.language())
            .code
            .clone();

        PageIdentity {
            uid: self.uid(),
            parents: self
                .request
                .chain(self.id)
                .iter()
                .filter(|&&id| id != self.id)
                .map(|&id| self.request.uid(id))
                .collect(),
            language: language_code,
            slug: self.slug(language),
            uri: self.uri(language),
            url: self.url(language),
        }
    }
}

impl std::fmt::Debug for PageRef<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRef")
            .field("id", &self.id)
            .field("uid", &self.uid())
            .finish()
    }
}

/// Computed identifiers of a page in one language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageIdentity {
    pub uid: String,
    /// Uids of the ancestors, top-down.
    pub parents: Vec<String>,
    pub language: String,
    pub slug: String,
    pub uri: String,
    pub url: String,
}

impl<'s> Request<'s> {
    /// Handle for a page of this request.
    #[must_use]
    pub fn page(&self, id: PageId) -> PageRef<'_, 's> {
        PageRef { request: self, id }
    }
}
