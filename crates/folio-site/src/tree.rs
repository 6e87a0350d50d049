//! Page tree arena.
//!
//! Pages are stored in a flat `Vec<PageNode>` owned by a
//! [`Request`](crate::Request); parent links are indices into the same
//! vector. Node 0 is the site root (the content directory itself), which is
//! not a page: it has no uid, no slug and no parent.

use serde::Serialize;

use crate::cache::PageCache;

/// Index of a page in the request's page arena.
///
/// Ids are only meaningful for the [`Request`](crate::Request) that handed
/// them out; [`PageId::ROOT`] is the one id valid in every request. Passing
/// an id to another request panics or names a different page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PageId(usize);

impl PageId {
    /// The site root.
    pub const ROOT: PageId = PageId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// True for the site root.
    #[must_use]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// A page directory and its request-scoped cache.
#[derive(Debug)]
pub(crate) struct PageNode {
    /// Identifier derived from the directory name.
    pub uid: String,
    /// Directory name as found on disk.
    pub dirname: String,
    /// Storage path of the directory, `""` for the root.
    pub path: String,
    /// Sort number of listed pages.
    pub num: Option<u32>,
    pub parent: Option<PageId>,
    pub cache: PageCache,
}

impl PageNode {
    pub fn root() -> Self {
        Self {
            uid: String::new(),
            dirname: String::new(),
            path: String::new(),
            num: None,
            parent: None,
            cache: PageCache::default(),
        }
    }

    pub fn child(parent: PageId, parent_path: &str, dirname: &str) -> Self {
        let (num, uid) = split_dirname(dirname);
        Self {
            uid: uid.to_owned(),
            dirname: dirname.to_owned(),
            path: folio_storage::join_path(parent_path, dirname),
            num,
            parent: Some(parent),
            cache: PageCache::default(),
        }
    }
}

/// Split a directory name into sort number and uid.
///
/// `01-about` is the listed page `about` with number 1; `about` is unlisted.
/// A name that is only a number (`2024`) is an unlisted page with that uid.
pub(crate) fn split_dirname(dirname: &str) -> (Option<u32>, &str) {
    if let Some((prefix, uid)) = dirname.split_once('-')
        && !uid.is_empty()
        && !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_digit())
        && let Ok(num) = prefix.parse()
    {
        return (Some(num), uid);
    }
    (None, dirname)
}

/// Sort key: listed pages by number first, then unlisted pages by name.
pub(crate) fn sort_key(node: &PageNode) -> (bool, u32, &str) {
    (node.num.is_none(), node.num.unwrap_or(0), &node.dirname)
}
