//! Per-page, request-scoped memoization.
//!
//! Every [`PageNode`](crate::tree::PageNode) owns one [`PageCache`]. The
//! cache is never shared between requests and is cleared as a whole by
//! [`PageCache::invalidate`] whenever the page's files change.

use std::collections::HashMap;
use std::rc::Rc;

use crate::content::ContentRecord;
use crate::inventory::Inventory;
use crate::tree::PageId;

#[derive(Debug, Default)]
pub(crate) struct PageCache {
    /// Classified directory listing.
    pub inventory: Option<Rc<Inventory>>,
    /// Child pages in sort order, derived from the inventory.
    pub children: Option<Rc<[PageId]>>,
    /// Page content resolved for the current language, keyed by code.
    pub content: HashMap<String, Rc<ContentRecord>>,
    /// Attached file metadata keyed by (file name, code).
    pub files: HashMap<(String, String), Rc<ContentRecord>>,
    /// Slugs keyed by code.
    pub slug: HashMap<String, String>,
}

impl PageCache {
    /// Drop every cached value at once.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.inventory.is_none()
            && self.children.is_none()
            && self.content.is_empty()
            && self.files.is_empty()
            && self.slug.is_empty()
    }
}
