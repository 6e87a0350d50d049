//! Shared test fixtures: an English/German site on mock storage.

use std::sync::Arc;

use folio_storage::MockStorage;

use crate::language::{Language, LanguageSet};
use crate::site::{Site, SiteOptions};

pub(crate) const BASE_URL: &str = "https://example.com";

pub(crate) fn languages() -> LanguageSet {
    LanguageSet::new(
        vec![
            Language::new("en", "English", "en_US", true),
            Language::new("de", "Deutsch", "de_DE", false),
        ],
        BASE_URL,
    )
    .unwrap()
}

/// Content tree used across the crate's tests.
///
/// ```text
/// site.txt
/// home/            home.txt, home.de.txt
///   about/         about.txt, about.de.txt (url_key "Über uns")
/// blog/            blog.txt, blog.de.txt (url_key "baender"), photo.jpg + meta, notes.pdf
///   01-first-post/ post.txt, post.de.txt (url_key "Erster Beitrag")
///   02-second-post/ post.txt
///   drafts/        (empty)
/// news/            news.txt (url_key "weblog"), news.de.txt (url_key "blog")
/// error/           error.txt, error.de.txt
/// ```
pub(crate) fn storage() -> MockStorage {
    MockStorage::new()
        .with_file("site.txt", "Title: Example")
        .with_file("home/home.txt", "Title: Home")
        .with_file("home/home.de.txt", "Title: Startseite")
        .with_file("home/about/about.txt", "Title: About")
        .with_file(
            "home/about/about.de.txt",
            "Title: Über uns\n\n----\n\nUrl-Key: Über uns",
        )
        .with_file(
            "blog/blog.txt",
            "Title: Hello\n\n----\n\nDate: 2020-01-01\n\n----\n\nText: Welcome",
        )
        .with_file(
            "blog/blog.de.txt",
            "Title: Hallo\n\n----\n\nUrl-Key: baender\n\n----\n\nText:",
        )
        .with_file("blog/photo.jpg", "")
        .with_file("blog/photo.jpg.txt", "Caption: A photo\n\n----\n\nCredit: Jane")
        .with_file("blog/photo.jpg.de.txt", "Caption: Ein Foto")
        .with_file("blog/notes.pdf", "")
        .with_file("blog/01-first-post/post.txt", "Title: First")
        .with_file(
            "blog/01-first-post/post.de.txt",
            "Title: Erster\n\n----\n\nUrl-Key: Erster Beitrag",
        )
        .with_file("blog/02-second-post/post.txt", "Title: Second")
        .with_dir("blog/drafts")
        .with_file("news/news.txt", "Title: News\n\n----\n\nUrl-Key: weblog")
        .with_file("news/news.de.txt", "Title: Neuigkeiten\n\n----\n\nUrl-Key: blog")
        .with_file("error/error.txt", "Title: Not found")
        .with_file("error/error.de.txt", "Title: Nicht gefunden")
}

pub(crate) fn remembering_options() -> SiteOptions {
    SiteOptions {
        remember_language: true,
        ..SiteOptions::default()
    }
}

pub(crate) fn site_over_shared(storage: Arc<MockStorage>, options: SiteOptions) -> Site {
    Site::new(storage, languages(), options)
}

pub(crate) fn site_over(storage: MockStorage, options: SiteOptions) -> Site {
    site_over_shared(Arc::new(storage), options)
}

/// Fixture site, with a handle on its storage for call counters.
pub(crate) fn site() -> (Arc<MockStorage>, Site) {
    site_with(|storage| storage)
}

/// Fixture site with extra files.
pub(crate) fn site_with(extend: impl FnOnce(MockStorage) -> MockStorage) -> (Arc<MockStorage>, Site) {
    let storage = Arc::new(extend(storage()));
    let site = site_over_shared(Arc::clone(&storage), SiteOptions::default());
    (storage, site)
}
