//! Request-scoped context.
//!
//! A [`Request`] owns the page arena, every page cache, the current
//! language and the current page. It is created by [`Site::request`], used
//! by one request and dropped with it, so cached values never leak between
//! requests.
//!
//! Page ids come from this request's arena (via [`Request::find`],
//! [`Request::children`] or routing) and must not be used with another
//! request: accessors index the arena directly and panic on an id the
//! request never allocated.
//!
//! Lookups take `&self`: caches sit behind `RefCell`s, which makes a
//! `Request` `!Sync`. Borrows are held only for the duration of a single
//! read or write of the arena, never across calls back into the request.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use folio_storage::Entry;

use crate::cache::PageCache;
use crate::inventory::Inventory;
use crate::language::Language;
use crate::session::{LANGUAGE_SESSION_KEY, Session};
use crate::site::Site;
use crate::tree::{PageId, PageNode, sort_key};

/// Request-scoped page tree, caches and language state.
pub struct Request<'s> {
    site: &'s Site,
    nodes: RefCell<Vec<PageNode>>,
    /// Arena index by storage path.
    index: RefCell<HashMap<String, PageId>>,
    language: Cell<&'s Language>,
    current_page: Cell<Option<PageId>>,
    session: RefCell<Option<&'s mut dyn Session>>,
}

impl<'s> Request<'s> {
    pub(crate) fn new(site: &'s Site) -> Self {
        let mut index = HashMap::new();
        index.insert(String::new(), PageId::ROOT);

        Self {
            site,
            nodes: RefCell::new(vec![PageNode::root()]),
            index: RefCell::new(index),
            language: Cell::new(site.languages().default_language()),
            current_page: Cell::new(None),
            session: RefCell::new(None),
        }
    }

    /// Attach the host's session store.
    #[must_use]
    pub fn with_session(self, session: &'s mut dyn Session) -> Self {
        *self.session.borrow_mut() = Some(session);
        self
    }

    #[must_use]
    pub fn site(&self) -> &'s Site {
        self.site
    }

    /// Language of this request.
    #[must_use]
    pub fn language(&self) -> &'s Language {
        self.language.get()
    }

    /// Switch the request language.
    ///
    /// Returns `false` and keeps the current language if `code` isn't
    /// configured.
    pub fn set_language(&self, code: &str) -> bool {
        match self.site.languages().find(code) {
            Some(language) => {
                self.language.set(language);
                true
            }
            None => false,
        }
    }

    /// Page selected by the last [`route`](Self::route) call.
    #[must_use]
    pub fn current_page(&self) -> Option<PageId> {
        self.current_page.get()
    }

    pub(crate) fn set_current_page(&self, page: Option<PageId>) {
        self.current_page.set(page);
    }

    pub(crate) fn session_get(&self, key: &str) -> Option<String> {
        self.session.borrow().as_ref().and_then(|s| s.get(key))
    }

    pub(crate) fn session_set(&self, key: &str, value: &str) {
        if let Some(session) = self.session.borrow_mut().as_mut() {
            session.set(key, value);
        }
    }

    /// Language remembered by the session, if still configured.
    pub(crate) fn remembered_language(&self) -> Option<&'s Language> {
        let code = self.session_get(LANGUAGE_SESSION_KEY)?;
        self.site.languages().find(&code)
    }

    /// Resolve an optional explicit language code.
    ///
    /// Unknown codes are treated like no code at all.
    pub(crate) fn explicit_language(&self, code: Option<&str>) -> Option<&'s Language> {
        code.and_then(|c| self.site.languages().find(c))
    }

    /// Panics if `page` wasn't allocated by this request.
    fn with_node<R>(&self, page: PageId, f: impl FnOnce(&PageNode) -> R) -> R {
        f(&self.nodes.borrow()[page.index()])
    }

    pub(crate) fn with_cache<R>(&self, page: PageId, f: impl FnOnce(&mut PageCache) -> R) -> R {
        f(&mut self.nodes.borrow_mut()[page.index()].cache)
    }

    /// Page identifier (directory name without sort number).
    #[must_use]
    pub fn uid(&self, page: PageId) -> String {
        self.with_node(page, |n| n.uid.clone())
    }

    /// Directory name on disk.
    #[must_use]
    pub fn dirname(&self, page: PageId) -> String {
        self.with_node(page, |n| n.dirname.clone())
    }

    /// Sort number of a listed page.
    #[must_use]
    pub fn num(&self, page: PageId) -> Option<u32> {
        self.with_node(page, |n| n.num)
    }

    /// Storage path of the page directory.
    #[must_use]
    pub fn storage_path(&self, page: PageId) -> String {
        self.with_node(page, |n| n.path.clone())
    }

    /// Parent page. Top-level pages and the root have none.
    #[must_use]
    pub fn parent(&self, page: PageId) -> Option<PageId> {
        self.with_node(page, |n| n.parent)
            .filter(|parent| !parent.is_root())
    }

    /// Ancestors and the page itself, top-down, without the site root.
    #[must_use]
    pub fn chain(&self, page: PageId) -> Vec<PageId> {
        let mut chain = Vec::new();
        let mut current = Some(page).filter(|p| !p.is_root());
        while let Some(id) = current {
            chain.push(id);
            current = self.parent(id);
        }
        chain.reverse();
        chain
    }

    /// True for the configured home page.
    #[must_use]
    pub fn is_home(&self, page: PageId) -> bool {
        self.is_top_level_named(page, &self.site.options().home)
    }

    /// True for the configured error page.
    #[must_use]
    pub fn is_error(&self, page: PageId) -> bool {
        self.is_top_level_named(page, &self.site.options().error)
    }

    fn is_top_level_named(&self, page: PageId, uid: &str) -> bool {
        self.with_node(page, |n| n.parent == Some(PageId::ROOT) && n.uid == uid)
    }

    /// Classified listing of the page directory.
    ///
    /// Built on first use and cached until the page is invalidated. A
    /// directory that can't be listed yields an empty inventory.
    #[must_use]
    pub fn inventory(&self, page: PageId) -> Rc<Inventory> {
        if let Some(inventory) = self.with_cache(page, |c| c.inventory.clone()) {
            return inventory;
        }

        let path = self.storage_path(page);
        let listing = self.site.storage().list(&path).unwrap_or_else(|e| {
            if !e.is_not_found() {
                tracing::warn!(path = %path, error = %e, "Failed to list page directory");
            }
            Vec::<Entry>::new()
        });

        let languages = self.site.languages();
        let inventory = Rc::new(Inventory::build(
            &listing,
            &self.site.language_codes(),
            &languages.default_language().code,
            &self.site.options().content_suffix,
        ));

        self.with_cache(page, |c| c.inventory = Some(Rc::clone(&inventory)));
        inventory
    }

    /// Child pages: listed pages by number, then unlisted pages by name.
    #[must_use]
    pub fn children(&self, page: PageId) -> Rc<[PageId]> {
        if let Some(children) = self.with_cache(page, |c| c.children.clone()) {
            return children;
        }

        let inventory = self.inventory(page);
        let parent_path = self.storage_path(page);

        let mut children: Vec<PageId> = inventory
            .children
            .iter()
            .map(|dirname| self.intern(page, &parent_path, dirname))
            .collect();

        {
            let nodes = self.nodes.borrow();
            children.sort_by(|a, b| sort_key(&nodes[a.index()]).cmp(&sort_key(&nodes[b.index()])));
        }

        let children: Rc<[PageId]> = Rc::from(children);
        self.with_cache(page, |c| c.children = Some(Rc::clone(&children)));
        children
    }

    /// Arena id for a child directory, allocating a node on first sight.
    fn intern(&self, parent: PageId, parent_path: &str, dirname: &str) -> PageId {
        let node = PageNode::child(parent, parent_path, dirname);
        if let Some(&id) = self.index.borrow().get(&node.path) {
            return id;
        }

        let mut nodes = self.nodes.borrow_mut();
        let id = PageId::new(nodes.len());
        self.index.borrow_mut().insert(node.path.clone(), id);
        nodes.push(node);
        id
    }

    /// Find a page by its uid path (e.g. `blog/first-post`).
    #[must_use]
    pub fn find(&self, path: &str) -> Option<PageId> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return None;
        }
        self.walk(PageId::ROOT, &segments, |child, segment| {
            self.with_node(child, |n| n.uid == segment)
        })
    }

    /// Descend from `start`, matching one child per segment.
    pub(crate) fn walk(
        &self,
        start: PageId,
        segments: &[&str],
        matches: impl Fn(PageId, &str) -> bool,
    ) -> Option<PageId> {
        let mut current = start;
        for segment in segments {
            current = self
                .children(current)
                .iter()
                .copied()
                .find(|&child| matches(child, segment))?;
        }
        Some(current)
    }

    /// Drop everything cached for a page.
    pub fn invalidate(&self, page: PageId) {
        tracing::debug!(page = %self.storage_path(page), "Invalidating page cache");
        self.with_cache(page, PageCache::invalidate);
    }

    #[cfg(test)]
    pub(crate) fn cache_is_empty(&self, page: PageId) -> bool {
        self.with_cache(page, |c| PageCache::is_empty(c))
    }
}
