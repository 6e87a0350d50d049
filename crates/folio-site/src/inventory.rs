//! Page directory classification.
//!
//! [`Inventory::build`] partitions the raw listing of a page directory into
//! content files, per-language metadata of attached files, attached files and
//! subpage directories. Files are named:
//!
//! - `<template>.<lang>.<suffix>` - page content (the default language may
//!   omit `.<lang>`)
//! - `<file>.<lang>.<suffix>` - metadata of the attached file `<file>`
//!
//! The builder is a pure function of the listing; callers cache the result.

use std::collections::{BTreeMap, BTreeSet};

use folio_storage::Entry;
use serde::Serialize;

/// Classified contents of a page directory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Page content file per language code.
    pub content: BTreeMap<String, String>,
    /// Metadata files per attached file, per language code.
    pub meta: BTreeMap<String, BTreeMap<String, String>>,
    /// Attached (non-content) files.
    pub files: BTreeSet<String>,
    /// Subpage directory names.
    pub children: BTreeSet<String>,
    /// Content files shadowed by another file for the same language.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub ignored: BTreeSet<String>,
}

/// How the language of a content file name was determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Tag {
    /// `name.xx.suffix` where `xx` is not a configured code.
    Unknown,
    /// `name.suffix` or `name.xx.suffix` with a configured `xx`.
    Known,
}

/// A content-suffixed file name split into base name and language.
struct ContentName<'f, 'l> {
    base: &'f str,
    language: &'l str,
    tag: Tag,
}

/// Split `name.(lang.)?suffix`.
///
/// Returns `None` if the file doesn't carry the content suffix. A tag that
/// isn't a configured code stays part of the base name.
fn split_content_name<'f, 'l>(
    filename: &'f str,
    codes: &[&'l str],
    default_code: &'l str,
    suffix: &str,
) -> Option<ContentName<'f, 'l>> {
    let stem = filename.strip_suffix(suffix)?.strip_suffix('.')?;
    if stem.is_empty() {
        return None;
    }

    if let Some((base, tag)) = stem.rsplit_once('.')
        && !base.is_empty()
    {
        if let Some(&code) = codes.iter().find(|&&code| code == tag) {
            return Some(ContentName {
                base,
                language: code,
                tag: Tag::Known,
            });
        }
        return Some(ContentName {
            base: stem,
            language: default_code,
            tag: Tag::Unknown,
        });
    }

    Some(ContentName {
        base: stem,
        language: default_code,
        tag: Tag::Known,
    })
}

/// Put `filename` into `slot` under `language` unless an entry with an equal
/// or better tag already holds it. Returns the entry that lost.
fn claim(
    slot: &mut BTreeMap<String, String>,
    tags: &mut BTreeMap<String, Tag>,
    language: &str,
    tag: Tag,
    filename: &str,
) -> Option<String> {
    match tags.get(language) {
        Some(&existing) if existing >= tag => Some(filename.to_owned()),
        _ => {
            tags.insert(language.to_owned(), tag);
            slot.insert(language.to_owned(), filename.to_owned())
        }
    }
}

impl Inventory {
    /// Classify a directory listing.
    ///
    /// # Arguments
    ///
    /// * `listing` - Entries of the page directory
    /// * `codes` - Configured language codes
    /// * `default_code` - Code of the default language
    /// * `suffix` - Content file extension without the dot (e.g. "txt")
    #[must_use]
    pub fn build(listing: &[Entry], codes: &[&str], default_code: &str, suffix: &str) -> Self {
        let mut inventory = Self::default();

        // Attached files first so metadata can be told apart from page content.
        for entry in listing {
            if entry.is_dir {
                inventory.children.insert(entry.name.clone());
            } else if split_content_name(&entry.name, codes, default_code, suffix).is_none() {
                inventory.files.insert(entry.name.clone());
            }
        }

        let mut content_tags: BTreeMap<String, Tag> = BTreeMap::new();
        let mut meta_tags: BTreeMap<String, BTreeMap<String, Tag>> = BTreeMap::new();

        for entry in listing.iter().filter(|e| !e.is_dir) {
            let Some(name) = split_content_name(&entry.name, codes, default_code, suffix) else {
                continue;
            };

            let (slot, tags) = if inventory.files.contains(name.base) {
                (
                    inventory.meta.entry(name.base.to_owned()).or_default(),
                    meta_tags.entry(name.base.to_owned()).or_default(),
                )
            } else {
                (&mut inventory.content, &mut content_tags)
            };

            if let Some(shadowed) = claim(slot, tags, name.language, name.tag, &entry.name) {
                tracing::warn!(
                    file = %shadowed,
                    language = %name.language,
                    "Ignoring content file shadowed by another file for the same language"
                );
                inventory.ignored.insert(shadowed);
            }
        }

        tracing::debug!(
            content = inventory.content.len(),
            files = inventory.files.len(),
            children = inventory.children.len(),
            "Built inventory"
        );

        inventory
    }

    /// Content file for a language.
    #[must_use]
    pub fn content_file(&self, code: &str) -> Option<&str> {
        self.content.get(code).map(String::as_str)
    }

    /// Metadata files of an attached file, keyed by language code.
    #[must_use]
    pub fn meta_files(&self, file: &str) -> Option<&BTreeMap<String, String>> {
        self.meta.get(file)
    }

    /// Base name of the page's content files (the template name).
    ///
    /// Prefers the default language file and falls back to any content file.
    #[must_use]
    pub fn template(&self, default_code: &str, codes: &[&str], suffix: &str) -> Option<&str> {
        let file = self
            .content
            .get(default_code)
            .or_else(|| self.content.values().next())?;
        split_content_name(file, codes, default_code, suffix).map(|n| n.base)
    }
}
